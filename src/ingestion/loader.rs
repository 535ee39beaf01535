//! Document loader
//!
//! Reads raw content from heterogeneous sources (web pages, PDF
//! directories, text files) into a uniform sequence of [`Document`]s.
//! A fetch or parse failure is fatal for the whole call: no retries,
//! no partial-success aggregation across sources.

use crate::errors::{RagError, Result};
use crate::types::{Document, SourceMetadata};
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// HTTP fetch timeout for URL sources
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Elements whose text makes up the readable body of a page
const CONTENT_SELECTOR: &str = "p, h1, h2, h3, h4, li, pre, blockquote";

pub struct DocumentLoader {
    client: reqwest::Client,
}

impl DocumentLoader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(RagError::Http)?;

        Ok(Self { client })
    }

    /// Load every descriptor into a flat document sequence
    pub async fn load(&self, sources: &[super::SourceDescriptor]) -> Result<Vec<Document>> {
        let mut documents = Vec::new();

        for source in sources {
            match source {
                super::SourceDescriptor::Url(url) => {
                    documents.push(self.load_url(url).await?);
                }
                super::SourceDescriptor::Directory(dir) => {
                    documents.extend(self.load_pdf_directory(dir)?);
                }
                super::SourceDescriptor::TextFile(path) => {
                    documents.push(self.load_text_file(path)?);
                }
            }
        }

        Ok(documents)
    }

    /// Fetch a web page and extract its readable text
    async fn load_url(&self, url: &str) -> Result<Document> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RagError::ExternalService(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(RagError::ExternalService(format!(
                "Fetching {} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| RagError::ExternalService(format!("Failed to read {}: {}", url, e)))?;

        let (title, text) = extract_page_text(&html)?;

        if text.trim().is_empty() {
            return Err(RagError::ExternalService(format!(
                "No readable text extracted from {}",
                url
            )));
        }

        let mut metadata = SourceMetadata::new(url);
        if let Some(title) = title {
            metadata = metadata.with_title(title);
        }

        Ok(Document::new(text, metadata))
    }

    /// Load every PDF file under a directory tree, one document per file
    fn load_pdf_directory(&self, dir: &Path) -> Result<Vec<Document>> {
        let mut pdf_paths = Vec::new();
        collect_pdfs(dir, &mut pdf_paths)?;

        // Deterministic load order
        pdf_paths.sort();

        let mut documents = Vec::new();
        for path in pdf_paths {
            let text = pdf_extract::extract_text(&path).map_err(|e| {
                RagError::ExternalService(format!(
                    "Failed to extract text from {}: {}",
                    path.display(),
                    e
                ))
            })?;

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();

            let metadata = SourceMetadata::new(path.display().to_string()).with_title(stem);
            documents.push(Document::new(text, metadata));
        }

        Ok(documents)
    }

    /// Load a plain-text file as a single document
    fn load_text_file(&self, path: &Path) -> Result<Document> {
        let text = std::fs::read_to_string(path)?;
        let metadata = SourceMetadata::new(path.display().to_string());
        Ok(Document::new(text, metadata))
    }
}

/// Extract (title, readable body text) from an HTML page
fn extract_page_text(html: &str) -> Result<(Option<String>, String)> {
    let document = Html::parse_document(html);

    let title_selector = parse_selector("title")?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let content_selector = parse_selector(CONTENT_SELECTOR)?;
    let mut blocks = Vec::new();
    for element in document.select(&content_selector) {
        let block = element.text().collect::<String>();
        let block = block.trim();
        if !block.is_empty() {
            blocks.push(block.to_string());
        }
    }

    Ok((title, blocks.join("\n\n")))
}

/// Recursively gather `*.pdf` files under `dir`, skipping dot-files and
/// dot-directories
fn collect_pdfs(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_pdfs(&path, out)?;
        } else {
            let is_pdf = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if path.is_file() && is_pdf {
                out.push(path);
            }
        }
    }

    Ok(())
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| RagError::ExternalService(format!("Invalid selector '{}': {}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::SourceDescriptor;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_page_text() {
        let html = r#"
            <html>
              <head><title>Agent Notes</title><style>p { color: red; }</style></head>
              <body>
                <script>var tracking = true;</script>
                <h1>Agents</h1>
                <p>Agents use tools.</p>
                <p>Agents plan ahead.</p>
              </body>
            </html>
        "#;

        let (title, text) = extract_page_text(html).unwrap();
        assert_eq!(title.as_deref(), Some("Agent Notes"));
        assert!(text.contains("Agents use tools."));
        assert!(text.contains("Agents plan ahead."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_extract_page_text_without_title() {
        let html = "<html><body><p>Just a paragraph.</p></body></html>";
        let (title, text) = extract_page_text(html).unwrap();
        assert!(title.is_none());
        assert_eq!(text, "Just a paragraph.");
    }

    #[tokio::test]
    async fn test_load_text_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "Cats are mammals.").unwrap();

        let loader = DocumentLoader::new().unwrap();
        let source = SourceDescriptor::resolve(file.to_str().unwrap()).unwrap();
        let docs = loader.load(&[source]).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "Cats are mammals.");
        assert!(docs[0].metadata.source.ends_with("notes.txt"));
    }

    #[tokio::test]
    async fn test_load_empty_pdf_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("readme.md"), "not a pdf").unwrap();

        let loader = DocumentLoader::new().unwrap();
        let source = SourceDescriptor::resolve(dir.path().to_str().unwrap()).unwrap();
        let docs = loader.load(&[source]).await.unwrap();

        // Non-PDF files in the directory are ignored
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_directory_walks_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("nested.pdf"), b"not a real pdf").unwrap();

        let loader = DocumentLoader::new().unwrap();
        let source = SourceDescriptor::resolve(dir.path().to_str().unwrap()).unwrap();

        // The nested file is visited; extracting its bogus bytes fails,
        // which a shallow directory scan would never reach
        let result = loader.load(&[source]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pdf_directory_skips_dot_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".draft.pdf"), b"not a real pdf").unwrap();

        let loader = DocumentLoader::new().unwrap();
        let source = SourceDescriptor::resolve(dir.path().to_str().unwrap()).unwrap();
        let docs = loader.load(&[source]).await.unwrap();

        assert!(docs.is_empty());
    }
}
