pub mod consent_handlers;
pub mod health_handlers;
pub mod qr_handlers;
pub mod scan_handlers;
pub mod url_handlers;
