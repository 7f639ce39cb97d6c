use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
