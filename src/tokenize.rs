//! HTML tokenization and stemming for the index and query paths.
//!
//! Retrieval is only sound when both sides of the system reduce words
//! identically, so the indexer and the query engine normalize through the
//! same [`Tokenizer`]. The morphological reducer is the Snowball English
//! (Porter) stemmer from `rust-stemmers`.

use rust_stemmers::{Algorithm, Stemmer};
use scraper::{Html, Selector};

/// Extracts weighted text regions from HTML and normalizes them to terms.
pub struct Tokenizer {
    stemmer: Stemmer,
    title: Selector,
    emphasis: Selector,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            title: Selector::parse("title").expect("static selector"),
            emphasis: Selector::parse("h1, h2, h3, b, strong").expect("static selector"),
        }
    }

    /// Tokenize an HTML document into stemmed terms.
    ///
    /// Regions are emitted in order: title, then h1/h2/h3/b/strong text,
    /// then the flat body text. The body repeats the earlier regions, so
    /// emphasized words count twice; the boost is intentional.
    pub fn html_terms(&self, html: &str) -> Vec<String> {
        self.html_tokens(html, true)
    }

    /// Tokenize an HTML document without stemming.
    ///
    /// Near-duplicate fingerprints and Jaccard token sets are computed
    /// over these raw tokens.
    pub fn html_raw_tokens(&self, html: &str) -> Vec<String> {
        self.html_tokens(html, false)
    }

    /// Tokenize plain text into stemmed terms (the query path).
    pub fn terms(&self, text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        self.collect(text, true, &mut terms);
        terms
    }

    fn html_tokens(&self, html: &str, stem: bool) -> Vec<String> {
        // Lenient parse: html5ever recovers from malformed fragments and
        // yields whatever text is salvageable.
        let document = Html::parse_document(html);
        let mut tokens = Vec::new();

        for element in document.select(&self.title) {
            self.collect(&element_text(element), stem, &mut tokens);
        }
        for element in document.select(&self.emphasis) {
            self.collect(&element_text(element), stem, &mut tokens);
        }
        let body: Vec<_> = document.root_element().text().collect();
        self.collect(&body.join(" "), stem, &mut tokens);

        tokens
    }

    fn collect(&self, text: &str, stem: bool, out: &mut Vec<String>) {
        for run in text.split(|c: char| !c.is_ascii_alphanumeric()) {
            if run.is_empty() {
                continue;
            }
            let lowered = run.to_ascii_lowercase();
            if stem {
                out.push(self.stemmer.stem(&lowered).into_owned());
            } else {
                out.push(lowered);
            }
        }
    }
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("running runs ran", &["run", "run", "ran"])]
    #[case("Learning!", &["learn"])]
    #[case("foo-bar_baz", &["foo", "bar", "baz"])]
    #[case("héllo wörld", &["h", "llo", "w", "rld"])] // ASCII runs only
    #[case("...", &[])]
    fn plain_text_terms(#[case] input: &str, #[case] expected: &[&str]) {
        let tokenizer = Tokenizer::new();
        let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
        check!(tokenizer.terms(input) == expected);
    }

    #[test]
    fn title_and_emphasis_are_prepended_to_body() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.html_terms(
            "<html><head><title>Machine Learning</title></head>\
             <body><p>plain <b>bold</b> text</p></body></html>",
        );
        // Title region, emphasis region, then the body (which repeats both).
        check!(
            terms
                == vec![
                    "machin", "learn", // title region
                    "bold",   // emphasis region
                    "machin", "learn", "plain", "bold", "text", // body
                ]
        );
    }

    #[test]
    fn emphasized_words_count_twice() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.html_terms("<p><strong>alpha</strong> beta</p>");
        let alphas = terms.iter().filter(|t| *t == "alpha").count();
        let betas = terms.iter().filter(|t| *t == "beta").count();
        check!(alphas == 2);
        check!(betas == 1);
    }

    #[test]
    fn raw_tokens_skip_stemming() {
        let tokenizer = Tokenizer::new();
        let raw = tokenizer.html_raw_tokens("<p>Learning machines</p>");
        check!(raw == vec!["learning", "machines"]);
    }

    #[test]
    fn malformed_html_still_yields_text() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.html_terms("<div><p>alpha <b>beta</div>");
        check!(terms.contains(&"alpha".to_string()));
        check!(terms.contains(&"beta".to_string()));
    }

    #[test]
    fn no_alphanumeric_content_yields_nothing() {
        let tokenizer = Tokenizer::new();
        check!(tokenizer.html_terms("<p>!!! ---</p>").is_empty());
        check!(tokenizer.html_terms("").is_empty());
    }

    /// Re-tokenizing the tokenizer's own output must be a fixed point;
    /// otherwise index terms and query terms could drift apart.
    #[test]
    fn terms_are_a_fixed_point_of_the_tokenizer() {
        let tokenizer = Tokenizer::new();
        let first = tokenizer.terms("machines are learning to tokenize documents quickly");
        let second = tokenizer.terms(&first.join(" "));
        check!(second == first);
    }
}
