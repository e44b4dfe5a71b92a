// CV extraction: PDF upload → text layer → model → fixed 17-field record.
// All model calls go through llm_client.

pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod record;
pub mod service;
pub mod upload;

#[cfg(test)]
pub mod test_support;
