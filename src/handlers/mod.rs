//! Transport adapters: translate gateway requests and change-stream
//! notifications into service calls.

pub mod apigateway;
pub mod stream;

pub use apigateway::ApiGatewayHandler;
pub use stream::StreamHandler;
