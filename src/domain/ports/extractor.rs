use crate::domain::{errors::DomainError, UploadedDocument};

pub trait TextExtractor: Send + Sync {
    /// Text of every page of one document, in page order.
    fn extract_document(&self, document: &UploadedDocument) -> Result<String, DomainError>;

    /// Concatenates the text of all documents in order. Stops at the first failure.
    fn extract(&self, documents: &[UploadedDocument]) -> Result<String, DomainError> {
        let mut text = String::new();
        for document in documents {
            text.push_str(&self.extract_document(document)?);
        }
        Ok(text)
    }
}
