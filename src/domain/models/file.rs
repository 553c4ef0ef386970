use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Longest sanitized name kept. Leaves room for the `<millis>-` prefix
/// within the usual 255-byte filename limit.
pub const MAX_SANITIZED_NAME_LEN: usize = 200;
const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Vec<u8>,
    pub filename: String,
}

impl FileData {
    pub fn new(content: Vec<u8>, filename: String) -> Self {
        Self { content, filename }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Generates on-disk names of the form `<millis>-<original>`.
///
/// The millisecond prefix never repeats within a process: when two names
/// are requested in the same millisecond the second one is bumped forward.
#[derive(Debug, Default)]
pub struct StoredNameGenerator {
    last_millis: AtomicI64,
}

impl StoredNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, original_name: &str) -> String {
        format!("{}-{}", self.next_millis(), sanitize_filename(original_name))
    }

    fn next_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_millis.load(Ordering::Relaxed);
        loop {
            let next = if now > last { now } else { last + 1 };
            match self.last_millis.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

/// Keeps the last path component, replaces anything outside
/// `[A-Za-z0-9._-]` with `_` and truncates long names, keeping a short
/// extension.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let safe_filename = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    if safe_filename.is_empty() || safe_filename.chars().all(|c| c == '.') {
        return "file".to_string();
    }

    truncate_filename(safe_filename)
}

// Input is ASCII only, so byte offsets are char boundaries.
fn truncate_filename(filename: String) -> String {
    if filename.len() <= MAX_SANITIZED_NAME_LEN {
        return filename;
    }

    match filename.rfind('.') {
        Some(dot) if dot > 0 && filename.len() - dot <= MAX_EXTENSION_LEN => {
            let extension = &filename[dot..];
            let stem = &filename[..MAX_SANITIZED_NAME_LEN - extension.len()];
            format!("{}{}", stem, extension)
        }
        _ => filename[..MAX_SANITIZED_NAME_LEN].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("a.png"), "a.png");
        assert_eq!(sanitize_filename("report-2024_v2.tar.gz"), "report-2024_v2.tar.gz");
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\my file.txt"), "my_file.txt");
        assert_eq!(sanitize_filename("naïve.txt"), "na_ve.txt");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("dir/"), "file");
        assert_eq!(sanitize_filename(".."), "file");
    }

    #[test]
    fn sanitize_truncates_long_names_and_keeps_the_extension() {
        let long = format!("{}.pdf", "a".repeat(300));
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized.len(), MAX_SANITIZED_NAME_LEN);
        assert!(sanitized.ends_with("a.pdf"));

        let no_extension = "b".repeat(300);
        assert_eq!(sanitize_filename(&no_extension), "b".repeat(MAX_SANITIZED_NAME_LEN));

        let exact = "c".repeat(MAX_SANITIZED_NAME_LEN);
        assert_eq!(sanitize_filename(&exact), exact);
    }

    #[test]
    fn generated_names_fit_the_filesystem_limit() {
        let generator = StoredNameGenerator::new();
        let name = generator.generate(&format!("{}.txt", "ü".repeat(200)));
        assert!(name.len() <= 255);
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn generated_prefixes_strictly_increase() {
        let generator = StoredNameGenerator::new();
        let prefixes: Vec<i64> = (0..50)
            .map(|_| {
                let name = generator.generate("x.txt");
                let (prefix, rest) = name.split_once('-').unwrap();
                assert_eq!(rest, "x.txt");
                prefix.parse().unwrap()
            })
            .collect();

        assert!(prefixes.windows(2).all(|w| w[0] < w[1]));
    }
}
