use anyhow::Result;
use tracing::debug;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, FAST, STORED};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use kdense_core::traits::Retriever;
use kdense_core::types::{Chunk, RetrievedContext};

use crate::analyzer::{register_analyzer, Analyzer, ANALYZER_NAME};

/// BM25 scoring through a throwaway in-RAM Tantivy index built per call.
///
/// The index is written by a single thread into a single segment, so scores
/// are reproducible; ties are re-ordered by corpus position afterwards.
#[derive(Debug, Clone, Default)]
pub struct Bm25Retriever {
	analyzer: Analyzer,
}

struct Fields {
	ordinal: Field,
	text: Field,
}

fn build_schema() -> (Schema, Fields) {
	let mut schema_builder = Schema::builder();
	let ordinal = schema_builder.add_u64_field("ordinal", STORED | FAST);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(ANALYZER_NAME).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing);
	let text = schema_builder.add_text_field("text", text_options);
	(schema_builder.build(), Fields { ordinal, text })
}

impl Bm25Retriever {
	pub fn new() -> Self { Self::default() }

	fn build_index(corpus: &[Chunk]) -> Result<(Index, Fields)> {
		let (schema, fields) = build_schema();
		let index = Index::create_in_ram(schema);
		register_analyzer(&index);
		let mut index_writer: IndexWriter = index.writer_with_num_threads(1, 50_000_000)?;
		for (i, c) in corpus.iter().enumerate() {
			index_writer.add_document(doc!(fields.ordinal => i as u64, fields.text => c.text.clone()))?;
		}
		index_writer.commit()?;
		Ok((index, fields))
	}

	fn build_query(&self, query: &str, text: Field) -> Option<BooleanQuery> {
		let mut terms = self.analyzer.tokens(query);
		terms.sort();
		terms.dedup();
		if terms.is_empty() { return None; }
		let clauses: Vec<(Occur, Box<dyn Query>)> = terms
			.iter()
			.map(|t| {
				let q: Box<dyn Query> = Box::new(TermQuery::new(Term::from_field_text(text, t), IndexRecordOption::WithFreqs));
				(Occur::Should, q)
			})
			.collect();
		Some(BooleanQuery::new(clauses))
	}
}

impl Retriever for Bm25Retriever {
	fn name(&self) -> &'static str { "bm25" }

	fn retrieve(&self, query: &str, corpus: &[Chunk], k: usize) -> Result<RetrievedContext> {
		if k == 0 || corpus.is_empty() { return Ok(RetrievedContext::empty()); }
		let (index, fields) = Self::build_index(corpus)?;
		let Some(q) = self.build_query(query, fields.text) else { return Ok(RetrievedContext::empty()); };
		let reader: IndexReader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let searcher = reader.searcher();
		let top_docs = searcher.search(&q, &TopDocs::with_limit(corpus.len()))?;
		let mut scored = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let ordinal = doc
				.get_first(fields.ordinal)
				.and_then(|v| v.as_u64())
				.ok_or_else(|| anyhow::anyhow!("indexed chunk without ordinal"))?;
			let i = usize::try_from(ordinal)?;
			if i < corpus.len() { scored.push((i, score)); }
		}
		debug!(chunks = corpus.len(), matched = scored.len(), k, "bm25 search");
		Ok(crate::rank(scored, corpus, k))
	}
}
