/// Canonicalizes line-break markup in item bodies to plain newlines.
///
/// Literal substring replacement only: the three `<br>` spellings become a
/// newline, then doubled newlines are collapsed until none remain so that
/// normalizing an already-normalized body is a no-op. Everything else in the
/// body, entities and tags included, passes through untouched.
pub fn normalize(raw: &str) -> String {
    let mut body = raw
        .replace("<br />", "\n")
        .replace("<br>", "\n")
        .replace("<br/>", "\n");
    while body.contains("\n\n") {
        body = body.replace("\n\n", "\n");
    }
    body
}
