//! Consultation record renderer
//!
//! Writes a plain UTF-8 consultation record (`bien_ban_<room>_<millis>.txt`)
//! with two sections: consultation details and clinical content.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use consult_core::{slugify, DocumentRenderer, DomainError, RenderedDocument};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

const TITLE: &str = "BIÊN BẢN HỘI CHẨN";
const MISSING: &str = "N/A";

/// Consultation details section: `THONG_TIN_HOI_CHAN`
const INFO_SECTION: (&str, &str) = ("THONG_TIN_HOI_CHAN", "I. THÔNG TIN HỘI CHẨN");
const INFO_FIELDS: &[(&str, &str)] = &[
    ("ngayHoiChan", "Ngày hội chẩn"),
    ("capHoiChan", "Cấp hội chẩn"),
    ("chuTri", "Chủ trì"),
    ("thuKy", "Thư ký"),
    ("tienLuong", "Tiên lượng"),
];

/// Clinical content section: `NOI_DUNG_CHUYEN_MON`
const CONTENT_SECTION: (&str, &str) = ("NOI_DUNG_CHUYEN_MON", "II. NỘI DUNG CHUYÊN MÔN");
const CONTENT_FIELDS: &[(&str, &str)] = &[
    ("lamSang", "Lâm sàng"),
    ("tomTatCanLamSang", "Tóm tắt cận lâm sàng"),
    ("chanDoan", "Chẩn đoán"),
    ("chanDoanKemTheo", "Chẩn đoán kèm theo"),
    ("ketLuan", "Kết luận"),
    ("huongDieuTri", "Hướng điều trị"),
    ("chiDinhXetNghiem", "Chỉ định xét nghiệm"),
];

/// Renders transcripts into text files under an export directory
#[derive(Debug, Clone)]
pub struct TextDocumentRenderer {
    dir: PathBuf,
}

impl TextDocumentRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Render the record body
    pub fn render_text(transcript: &Value, room_id: &str) -> String {
        let mut out = String::new();
        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&format!("Phòng: {room_id}\n\n"));

        let info = &transcript[INFO_SECTION.0];
        out.push_str(INFO_SECTION.1);
        out.push('\n');
        for (key, label) in INFO_FIELDS {
            out.push_str(&format!("{label}: {}\n", field_text(&info[*key])));
        }
        out.push('\n');

        let content = &transcript[CONTENT_SECTION.0];
        out.push_str(CONTENT_SECTION.1);
        out.push('\n');
        for (index, (key, label)) in CONTENT_FIELDS.iter().enumerate() {
            out.push_str(&format!("{}. {label}:\n", index + 1));
            out.push_str(&format!("    {}\n", field_text(&content[*key])));
        }

        out
    }

    fn file_stem(room_id: &str) -> String {
        let slug = slugify(room_id);
        let room = if slug.is_empty() { "unknown" } else { slug.as_str() };
        format!("bien_ban_{room}_{}", Utc::now().timestamp_millis())
    }
}

/// Text for a transcript field; empty and missing values render as N/A
fn field_text(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::String(s) if s.trim().is_empty() => MISSING.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn storage_error(e: &std::io::Error) -> DomainError {
    DomainError::InternalError(format!("failed to write document: {e}"))
}

#[async_trait]
impl DocumentRenderer for TextDocumentRenderer {
    async fn render(&self, transcript: &Value, room_id: &str) -> Result<RenderedDocument, DomainError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(&e))?;

        let body = Self::render_text(transcript, room_id);
        let stem = Self::file_stem(room_id);

        // Same room in the same millisecond: pick the next free name
        let mut attempt = 1u32;
        loop {
            let file_name = if attempt == 1 {
                format!("{stem}.txt")
            } else {
                format!("{stem}_{attempt}.txt")
            };
            let file_path = self.dir.join(&file_name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file_path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(body.as_bytes())
                        .await
                        .map_err(|e| storage_error(&e))?;
                    file.flush().await.map_err(|e| storage_error(&e))?;

                    tracing::info!(room_id = %room_id, file = %file_name, "Document rendered");
                    return Ok(RenderedDocument {
                        file_path,
                        file_name,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(storage_error(&e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript() -> Value {
        json!({
            "THONG_TIN_HOI_CHAN": {
                "ngayHoiChan": "19/10/2026",
                "capHoiChan": "Hội chẩn cấp khoa",
                "chuTri": "Bác sĩ A",
                "thuKy": ""
            },
            "NOI_DUNG_CHUYEN_MON": {
                "lamSang": "Đau ngực, khó thở.",
                "chanDoan": "Viêm phế quản cấp",
                "chiDinhXetNghiem": null
            }
        })
    }

    #[test]
    fn test_render_text_sections() {
        let text = TextDocumentRenderer::render_text(&transcript(), "bac-si-a");

        assert!(text.starts_with("BIÊN BẢN HỘI CHẨN\n"));
        assert!(text.contains("Phòng: bac-si-a"));
        assert!(text.contains("I. THÔNG TIN HỘI CHẨN"));
        assert!(text.contains("Chủ trì: Bác sĩ A"));
        assert!(text.contains("Thư ký: N/A"));
        assert!(text.contains("II. NỘI DUNG CHUYÊN MÔN"));
        assert!(text.contains("3. Chẩn đoán:\n    Viêm phế quản cấp"));
        assert!(text.contains("7. Chỉ định xét nghiệm:\n    N/A"));
    }

    #[test]
    fn test_render_text_tolerates_non_object() {
        let text = TextDocumentRenderer::render_text(&json!("free text"), "r");
        assert!(text.contains("Ngày hội chẩn: N/A"));
    }

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(&json!(120)), "120");
        assert_eq!(field_text(&json!("  ")), "N/A");
        assert_eq!(field_text(&Value::Null), "N/A");
    }

    #[tokio::test]
    async fn test_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TextDocumentRenderer::new(dir.path().join("exports"));

        let doc = renderer.render(&transcript(), "../Phòng 1").await.unwrap();

        assert!(doc.file_name.starts_with("bien_ban_phong-1_"));
        assert!(doc.file_name.ends_with(".txt"));
        assert_eq!(doc.file_path.parent(), Some(renderer.dir()));

        let written = tokio::fs::read_to_string(&doc.file_path).await.unwrap();
        assert!(written.contains("Viêm phế quản cấp"));
    }

    #[tokio::test]
    async fn test_render_same_millisecond_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = TextDocumentRenderer::new(dir.path());

        let (t1, t2) = (transcript(), transcript());
        let (a, b) = tokio::join!(renderer.render(&t1, "r"), renderer.render(&t2, "r"));
        assert_ne!(a.unwrap().file_path, b.unwrap().file_path);
    }
}
