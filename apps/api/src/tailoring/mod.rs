// Tailoring: the stateless HTTP boundary around the layout core.
// extract -> score -> rewrite -> normalize -> score; documents are rendered on demand
// from the text the client posts back. Nothing is kept between requests.

pub mod handlers;
pub mod prompts;
pub mod report;
pub mod rewriter;
pub mod slug;
