mod access_request_flow;
mod config_integration;
mod http_transport;
