//! Resource-type token → URL-safe path segment.

/// Dasherize a resource-type token for use as a URL path segment.
///
/// `blogPosts` → `blog-posts`, `comment_replies` → `comment-replies`.
/// Route *names* keep the original token; only URL paths are dasherized.
pub fn dasherize(token: &str) -> String {
  let mut out = String::with_capacity(token.len() + 4);
  for ch in token.chars() {
    if ch.is_ascii_uppercase() {
      if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
      }
      out.push(ch.to_ascii_lowercase());
    } else if ch == '_' || ch == ' ' {
      if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
      }
    } else {
      out.push(ch);
    }
  }
  out
}
