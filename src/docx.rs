//! OOXML wordprocessing implementation of [`DocumentEngine`], backed by
//! `docx-rs`.
//!
//! The host (template) document is authoritative: appending a module carries
//! its body content (paragraphs, tables) over whole, imports module styles
//! whose ids are not already defined by the host, and drops everything else
//! (section properties, headers/footers) so the template's formatting context
//! wins.

use std::collections::HashSet;
use std::io::Cursor;

use docx_rs::{read_docx, Docx};

use crate::compose::{DocumentEngine, EngineError};

/// Canonical MIME type of the document container format.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// File extension used for scratch files and default output paths.
pub const DOCX_EXTENSION: &str = "docx";

/// Document engine over `.docx` containers.
pub struct DocxEngine;

impl DocumentEngine for DocxEngine {
    type Doc = Docx;

    fn load(&self, bytes: &[u8]) -> Result<Self::Doc, EngineError> {
        read_docx(bytes).map_err(|e| EngineError::new(format!("failed to parse document: {e}")))
    }

    fn append(&self, host: &mut Self::Doc, module: Self::Doc) -> Result<(), EngineError> {
        // Host styles win on id collision; unmatched module styles are
        // imported so module content keeps resolving its references.
        let host_ids: HashSet<String> = host
            .styles
            .styles
            .iter()
            .map(|s| s.style_id.clone())
            .collect();
        for style in module.styles.styles {
            if !host_ids.contains(&style.style_id) {
                host.styles.styles.push(style);
            }
        }

        host.document.children.extend(module.document.children);
        Ok(())
    }

    fn serialize(&self, doc: Self::Doc) -> Result<Vec<u8>, EngineError> {
        let mut cursor = Cursor::new(Vec::new());
        doc.build()
            .pack(&mut cursor)
            .map_err(|e| EngineError::new(format!("failed to serialize document: {e}")))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Style, StyleType};

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut doc = Docx::new();
        for text in paragraphs {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut cursor = Cursor::new(Vec::new());
        doc.build().pack(&mut cursor).expect("pack test docx");
        cursor.into_inner()
    }

    fn body_text(doc: &Docx) -> Vec<String> {
        let mut out = Vec::new();
        for child in &doc.document.children {
            if let DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for pc in &p.children {
                    if let ParagraphChild::Run(run) = pc {
                        for rc in &run.children {
                            if let RunChild::Text(t) = rc {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                if !text.is_empty() {
                    out.push(text);
                }
            }
        }
        out
    }

    #[test]
    fn append_keeps_document_order() {
        let engine = DocxEngine;
        let mut host = engine.load(&docx_bytes(&["Intro"])).unwrap();
        let step1 = engine.load(&docx_bytes(&["Step 1"])).unwrap();
        let step2 = engine.load(&docx_bytes(&["Step 2"])).unwrap();

        engine.append(&mut host, step1).unwrap();
        engine.append(&mut host, step2).unwrap();

        let bytes = engine.serialize(host).unwrap();
        let merged = engine.load(&bytes).unwrap();
        assert_eq!(body_text(&merged), vec!["Intro", "Step 1", "Step 2"]);
    }

    #[test]
    fn host_style_wins_on_collision_and_unmatched_styles_import() {
        let engine = DocxEngine;
        let mut host = engine
            .load(&serialize_with_styles(
                &["Intro"],
                &[("Body", StyleType::Paragraph)],
            ))
            .unwrap();
        let module = engine
            .load(&serialize_with_styles(
                &["Step 1"],
                &[("Body", StyleType::Paragraph), ("Extra", StyleType::Paragraph)],
            ))
            .unwrap();

        engine.append(&mut host, module).unwrap();

        let body_count = host
            .styles
            .styles
            .iter()
            .filter(|s| s.style_id == "Body")
            .count();
        assert_eq!(body_count, 1, "colliding style must not be duplicated");
        assert!(
            host.styles.styles.iter().any(|s| s.style_id == "Extra"),
            "unmatched module style must be imported"
        );
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let engine = DocxEngine;
        assert!(engine.load(b"this is not a zip container").is_err());
    }

    fn serialize_with_styles(paragraphs: &[&str], styles: &[(&str, StyleType)]) -> Vec<u8> {
        let mut doc = Docx::new();
        for (id, ty) in styles {
            doc = doc.add_style(Style::new(*id, ty.clone()));
        }
        for text in paragraphs {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut cursor = Cursor::new(Vec::new());
        doc.build().pack(&mut cursor).expect("pack test docx");
        cursor.into_inner()
    }
}
