use tantivy::tokenizer::{
	Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer, TokenStream,
};
use tantivy::Index;

pub const ANALYZER_NAME: &str = "kdense_text";

const STOP_WORDS: &[&str] = &[
	"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
];

pub fn build_analyzer() -> TextAnalyzer {
	TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(STOP_WORDS.iter().map(|s| (*s).to_string())))
		.filter(Stemmer::new(Language::English))
		.build()
}

pub fn register_analyzer(index: &Index) {
	index.tokenizers().register(ANALYZER_NAME, build_analyzer());
}

/// Owned analyzer handle. `TextAnalyzer::token_stream` needs `&mut self`, so
/// every call works on a clone and the handle can be shared across threads.
#[derive(Clone)]
pub struct Analyzer {
	inner: TextAnalyzer,
}

impl Default for Analyzer {
	fn default() -> Self { Self { inner: build_analyzer() } }
}

impl std::fmt::Debug for Analyzer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(ANALYZER_NAME) }
}

impl Analyzer {
	pub fn new() -> Self { Self::default() }

	/// Normalised terms of `text`, in order, duplicates kept.
	pub fn tokens(&self, text: &str) -> Vec<String> {
		let mut analyzer = self.inner.clone();
		let mut stream = analyzer.token_stream(text);
		let mut out = Vec::new();
		while stream.advance() { out.push(stream.token().text.clone()); }
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_drops_stop_words() {
		let a = Analyzer::new();
		assert_eq!(a.tokens("The EGFR pathway and TP53"), vec!["egfr", "pathway", "tp53"]);
	}

	#[test]
	fn stems_plural_forms() {
		let a = Analyzer::new();
		assert_eq!(a.tokens("targets"), a.tokens("target"));
		assert_eq!(a.tokens("mechanisms"), a.tokens("mechanism"));
	}

	#[test]
	fn punctuation_splits_terms() {
		let a = Analyzer::new();
		assert_eq!(a.tokens("chembl.search_targets"), vec!["chembl", "search", "target"]);
	}
}
