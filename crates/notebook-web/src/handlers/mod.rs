pub mod error_page;
pub mod list;
pub mod sign;

use serde::Deserialize;

/// `?notebook_name=` as accepted by both the listing and the sign handler.
#[derive(Debug, Default, Deserialize)]
pub struct NotebookParams {
  pub notebook_name: Option<String>,
}
