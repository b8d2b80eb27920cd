#![allow(dead_code)]

pub mod mock_engine;
pub mod mock_handlers;

pub use mock_engine::{service_name_for, Call, MockDeployment, MockDeploymentState, StaticLocator};
pub use mock_handlers::{FailingHandler, HandlerCall, RecordingHandler};
