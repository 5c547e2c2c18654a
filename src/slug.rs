use crate::mapper::NormalizedRecord;

/// Produces the URL path segment for a record. The content system owns slug
/// uniqueness within a container; implementations only shape the text.
pub trait SlugGenerator {
    fn generate(&self, record: &NormalizedRecord, pid: i64) -> String;
}

/// Default generator: the record title, lowercased and dash-separated, with
/// the import id as fallback for untitled records.
pub struct TitleSlugger;

impl SlugGenerator for TitleSlugger {
    fn generate(&self, record: &NormalizedRecord, _pid: i64) -> String {
        let slug = slugify(&record.title);
        if slug.is_empty() {
            slugify(&record.import_id)
        } else {
            slug
        }
    }
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
