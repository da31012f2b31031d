use tracing::{debug, instrument};

use crate::domain::{ports::TextExtractor, DomainError, UploadedDocument};

/// Extracts the text layer of PDF documents with lopdf.
///
/// Pages whose content cannot be decoded (scanned images, unsupported fonts)
/// contribute nothing rather than failing the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    #[instrument(skip(self, document), fields(document = %document.name, bytes = document.size()))]
    fn extract_document(&self, document: &UploadedDocument) -> Result<String, DomainError> {
        let mut pdf = lopdf::Document::load_mem(&document.bytes)
            .map_err(|e| DomainError::extraction(&document.name, e.to_string()))?;

        // Owner-password-only files open with the empty user password.
        if pdf.is_encrypted() {
            pdf.decrypt("").map_err(|e| {
                DomainError::extraction(
                    &document.name,
                    format!("document is password protected: {e}"),
                )
            })?;
            debug!("decrypted with empty user password");
        }

        let pages = pdf.get_pages();
        let mut text = String::new();

        for &number in pages.keys() {
            match pdf.extract_text(&[number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => debug!(page = number, error = %e, "page has no extractable text"),
            }
        }

        debug!(pages = pages.len(), chars = text.len(), "document extracted");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, encryption, Document, Object, ObjectId, Stream, StringFormat};

    fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        save(build_pdf(pages))
    }

    fn save(mut doc: Document) -> Vec<u8> {
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn hex(bytes: Vec<u8>) -> Object {
        Object::String(bytes, StringFormat::Hexadecimal)
    }

    /// RC4 40-bit (V1, R2) encryption keyed on the empty user password.
    /// `user_check` is the `/U` entry; `None` leaves it out so any password opens the file.
    fn encrypt_rc4(doc: &mut Document, user_check: Option<Vec<u8>>) {
        let mut encrypt = dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "Length" => 40,
            "O" => hex(vec![0x4f; 32]),
            "P" => -44,
        };
        if let Some(check) = user_check {
            encrypt.set("U", hex(check));
        }
        let encrypt_id = doc.add_object(encrypt);
        doc.trailer.set("Encrypt", encrypt_id);
        doc.trailer.set("ID", vec![hex(vec![7; 16]), hex(vec![7; 16])]);

        let key = encryption::get_encryption_key(doc, "", false).unwrap();
        let streams: Vec<ObjectId> = doc
            .objects
            .iter()
            .filter(|(_, object)| matches!(object, Object::Stream(_)))
            .map(|(id, _)| *id)
            .collect();
        // RC4 is symmetric, so decrypting plaintext encrypts it.
        for id in streams {
            let plain = doc.get_object(id).unwrap();
            let cipher = encryption::decrypt_object(&key, id, plain).unwrap();
            if let Ok(Object::Stream(stream)) = doc.get_object_mut(id) {
                stream.set_content(cipher);
            }
        }
    }

    fn build_pdf(pages: &[Option<&str>]) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            };
            if let Some(text) = text {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 24.into()]),
                        Operation::new("Td", vec![100.into(), 600.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                page.set("Contents", content_id);
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = pdf_with_pages(&[Some("Hello"), Some("World")]);
        let doc = UploadedDocument::new("two-pages.pdf", bytes);

        let text = PdfTextExtractor::new().extract_document(&doc).unwrap();

        let hello = text.find("Hello").expect("first page text");
        let world = text.find("World").expect("second page text");
        assert!(hello < world);
    }

    #[test]
    fn test_image_only_page_yields_empty_text() {
        let bytes = pdf_with_pages(&[None]);
        let doc = UploadedDocument::new("scan.pdf", bytes);

        let text = PdfTextExtractor::new().extract_document(&doc).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_invalid_bytes_are_extraction_error() {
        let doc = UploadedDocument::new("broken.pdf", b"not a pdf at all".to_vec());

        let err = PdfTextExtractor::new().extract_document(&doc).unwrap_err();
        assert!(matches!(err, DomainError::Extraction { ref document, .. } if document == "broken.pdf"));
    }

    #[test]
    fn test_extract_concatenates_documents_and_fails_fast() {
        let extractor = PdfTextExtractor::new();
        let first = UploadedDocument::new("a.pdf", pdf_with_pages(&[Some("Alpha")]));
        let second = UploadedDocument::new("b.pdf", pdf_with_pages(&[Some("Beta")]));

        let text = extractor.extract(&[first.clone(), second]).unwrap();
        assert!(text.find("Alpha").unwrap() < text.find("Beta").unwrap());

        let broken = UploadedDocument::new("c.pdf", b"garbage".to_vec());
        assert!(extractor.extract(&[first, broken]).is_err());
    }

    #[test]
    fn test_owner_password_only_document_is_decrypted() {
        let mut doc = build_pdf(&[Some("Hello")]);
        encrypt_rc4(&mut doc, None);
        let bytes = save(doc);
        assert!(Document::load_mem(&bytes).unwrap().is_encrypted());

        let text = PdfTextExtractor::new()
            .extract_document(&UploadedDocument::new("owner_locked.pdf", bytes))
            .unwrap();

        assert!(text.contains("Hello"));
    }

    #[test]
    fn test_user_password_document_is_extraction_error() {
        let mut doc = build_pdf(&[Some("Secret")]);
        encrypt_rc4(&mut doc, Some(vec![0; 32]));
        let doc = UploadedDocument::new("locked.pdf", save(doc));

        let err = PdfTextExtractor::new().extract_document(&doc).unwrap_err();

        assert!(matches!(
            err,
            DomainError::Extraction { ref document, ref reason }
                if document == "locked.pdf" && reason.contains("password")
        ));
    }

    #[test]
    fn test_no_documents_yield_empty_text() {
        assert_eq!(PdfTextExtractor::new().extract(&[]).unwrap(), "");
    }
}
