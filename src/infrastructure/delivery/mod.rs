pub mod file;
pub mod render;
pub mod webhook;

pub use file::FileReportDelivery;
pub use render::{render_html, render_text};
pub use webhook::WebhookReportDelivery;
