// Handler unit tests, driven directly against the handler functions
mod alerts_test;
mod health_test;
mod session_test;
