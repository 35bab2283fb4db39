//! End-to-end checks: configuration and markup in, formatted errors out

use std::io::Write;

use prose_lint::{
    load_character_table, load_configuration, CollectingDistributor, Diagnostics, Document,
    DocumentBuilder, InputFormat, Parser, ResultFormat, SharedResources, ValidationEngine,
    ValidatorRegistry, WriterDistributor,
};
use tempfile::NamedTempFile;

const CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<configuration>
  <component name="Validator">
    <component name="MaxWordNumber">
      <property name="max_num" value="5"/>
    </component>
    <component name="InvalidWord">
      <property name="list" value="utilize,leverage"/>
    </component>
    <component name="ParagraphNumber">
      <property name="max_paragraph_num" value="2"/>
    </component>
  </component>
</configuration>"#;

fn engine(config: &str) -> ValidationEngine {
    let config = load_configuration(config).expect("configuration should load");
    ValidationEngine::from_configuration(
        &config,
        &SharedResources::new(),
        &ValidatorRegistry::with_builtin_validators(),
    )
    .expect("validators should build")
}

fn parse(format: InputFormat, name: &str, source: &str) -> Document {
    Parser::new(format)
        .parse(name, source, &mut Diagnostics::new())
        .expect("document should parse")
}

#[test]
fn test_five_word_limit_flags_only_the_long_sentence() {
    let doc = parse(
        InputFormat::Plain,
        "essay.txt",
        "This is fine. This line is much too long to pass a five word limit.\n",
    );
    let engine = engine(CONFIG);

    let errors = engine.check(&[doc], &mut CollectingDistributor::new());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].validator, "WordNumber");
    assert_eq!(
        errors[0].sentence.as_ref().map(|s| s.content.as_str()),
        Some("This line is much too long to pass a five word limit.")
    );
    assert_eq!(errors[0].file_name(), "essay.txt");
}

#[test]
fn test_document_without_sections_yields_nothing() {
    let empty = DocumentBuilder::new("").build();
    let errors = engine(CONFIG).check(&[empty], &mut CollectingDistributor::new());
    assert!(errors.is_empty());
}

#[test]
fn test_markdown_document_through_every_scope() {
    let source = "\
# Guide

We utilize tools. Short one.

Second paragraph.

Third paragraph here.

## Details

- Please leverage the cache.
";
    let doc = parse(InputFormat::Markdown, "guide.md", source);
    let errors = engine(CONFIG).check(&[doc], &mut CollectingDistributor::new());

    let found: Vec<_> = errors
        .iter()
        .map(|e| (e.validator.as_str(), e.line))
        .collect();
    assert_eq!(
        found,
        vec![
            ("InvalidWord", 3),
            ("InvalidWord", 11),
            ("ParagraphNumber", 1),
        ]
    );
}

#[test]
fn test_wiki_and_markdown_agree() {
    let markdown = parse(
        InputFormat::Markdown,
        "a.md",
        "# Title\n\nIt is *really* quite a long sentence indeed.\n",
    );
    let wiki = parse(
        InputFormat::Wiki,
        "a.wiki",
        "h1. Title\n\nIt is *really* quite a long sentence indeed.\n",
    );

    let engine = engine(CONFIG);
    let from_markdown = engine.check(&[markdown], &mut CollectingDistributor::new());
    let from_wiki = engine.check(&[wiki], &mut CollectingDistributor::new());

    assert_eq!(from_markdown.len(), 1);
    assert_eq!(from_wiki.len(), 1);
    assert_eq!(from_markdown[0].sentence, from_wiki[0].sentence);
}

#[test]
fn test_plain_report_output() {
    let doc = parse(InputFormat::Plain, "notes.txt", "Please leverage this.\n");
    let mut distributor = WriterDistributor::with_format(Vec::new(), ResultFormat::Plain);
    engine(CONFIG).check(&[doc], &mut distributor);

    let output = String::from_utf8(distributor.into_inner()).unwrap();
    assert_eq!(
        output,
        "ValidationError[InvalidWord][notes.txt : 1 (Invalid word found: \"leverage\")] at line: Please leverage this.\n"
    );
}

#[test]
fn test_xml_report_output() {
    let doc = parse(InputFormat::Plain, "", "Please leverage this.\n");
    let mut distributor = WriterDistributor::with_format(Vec::new(), ResultFormat::Xml);
    engine(CONFIG).check(&[doc], &mut distributor);

    let output = String::from_utf8(distributor.into_inner()).unwrap();
    assert_eq!(
        output,
        "<validation-result>\n\
         <error><validator>InvalidWord</validator>\
         <message>Invalid word found: \"leverage\"</message>\
         <lineNum>1</lineNum><sentence>Please leverage this.</sentence></error>\n\
         </validation-result>\n"
    );
}

#[test]
fn test_character_table_feeds_invalid_character() {
    let table = load_character_table(
        r#"<character-table>
             <character name="COMMA" value="," invalid-chars="，"/>
           </character-table>"#,
    )
    .unwrap();
    let config = load_configuration(
        r#"<configuration><component name="Validator">
             <component name="InvalidCharacter"/>
           </component></configuration>"#,
    )
    .unwrap();
    let engine = ValidationEngine::from_configuration(
        &config,
        &SharedResources::new().with_character_table(table),
        &ValidatorRegistry::with_builtin_validators(),
    )
    .unwrap();

    let doc = parse(InputFormat::Plain, "jp.txt", "Hello，world.\n");
    let errors = engine.check(&[doc], &mut CollectingDistributor::new());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Invalid symbol found: \"，\"");
}

#[test]
fn test_character_table_spacing_flags() {
    let table = load_character_table(
        r#"<character-table>
             <character name="COLON" value=":" after-space="true"/>
           </character-table>"#,
    )
    .unwrap();
    let config = load_configuration(
        r#"<configuration><component name="Validator">
             <component name="SymbolWithSpace"/>
           </component></configuration>"#,
    )
    .unwrap();
    let engine = ValidationEngine::from_configuration(
        &config,
        &SharedResources::new().with_character_table(table),
        &ValidatorRegistry::with_builtin_validators(),
    )
    .unwrap();

    let doc = parse(InputFormat::Plain, "notes.txt", "Note: fine.\n\nTodo:later.\n");
    let errors = engine.check(&[doc], &mut CollectingDistributor::new());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].validator, "SymbolWithSpace");
    assert_eq!(errors[0].line, 3);
}

#[test]
fn test_batch_skips_unreadable_files() {
    let mut good = NamedTempFile::with_suffix(".md").unwrap();
    good.write_all(b"Please leverage this.\n").unwrap();
    good.flush().unwrap();

    let parser = Parser::new(InputFormat::Markdown);
    let paths = [good.path().to_path_buf(), "/no/such/file.md".into()];
    let documents: Vec<_> = paths
        .iter()
        .filter_map(|path| parser.parse_file(path, &mut Diagnostics::new()).ok())
        .collect();
    assert_eq!(documents.len(), 1);

    let errors = engine(CONFIG).check(&documents, &mut CollectingDistributor::new());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].file_name(), good.path().display().to_string());
}
