use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use delta_html_engine::{ConverterOptions, DeltaHtmlConverter, InlineStyles};

#[derive(Parser)]
#[command(name = "delta-html")]
#[command(about = "Convert rich-text insert deltas to HTML")]
struct Cli {
    /// Input delta JSON file (`-` or absent reads stdin)
    input: Option<PathBuf>,

    /// Output HTML file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tag wrapped around implicit paragraphs
    #[arg(long, default_value = "p")]
    paragraph_tag: String,

    /// Prefix for generated CSS classes; empty emits bare names
    #[arg(long, default_value = "ql")]
    class_prefix: String,

    /// Emit style attributes instead of CSS classes
    #[arg(long)]
    inline_styles: bool,

    /// Leave text content unescaped
    #[arg(long)]
    no_encode_html: bool,

    /// Encode runs of spaces as &nbsp; sequences
    #[arg(long)]
    encode_whitespaces: bool,

    /// target applied to links without their own; empty disables it
    #[arg(long, default_value = "_blank")]
    link_target: String,

    /// rel applied to links without their own
    #[arg(long)]
    link_rel: Option<String>,

    /// Render adjacent blockquote lines as separate blocks
    #[arg(long)]
    no_multiline_blockquote: bool,

    /// Render adjacent same-level header lines as separate blocks
    #[arg(long)]
    no_multiline_header: bool,

    /// Render adjacent code-block lines as separate blocks
    #[arg(long)]
    no_multiline_codeblock: bool,

    /// Wrap every paragraph line in its own tag
    #[arg(long)]
    no_multiline_paragraph: bool,
}

impl Cli {
    fn options(&self) -> ConverterOptions {
        ConverterOptions {
            paragraph_tag: self.paragraph_tag.clone(),
            class_prefix: self.class_prefix.clone(),
            inline_styles: self.inline_styles.then(InlineStyles::default),
            encode_html: !self.no_encode_html,
            encode_whitespaces: self.encode_whitespaces,
            link_target: self.link_target.clone(),
            link_rel: self.link_rel.clone(),
            multi_line_blockquote: !self.no_multiline_blockquote,
            multi_line_header: !self.no_multiline_header,
            multi_line_codeblock: !self.no_multiline_codeblock,
            multi_line_paragraph: !self.no_multiline_paragraph,
            ..ConverterOptions::default()
        }
    }
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("failed to read stdin")?;
            Ok(json)
        }
    }
}

fn convert(json: &str, options: ConverterOptions) -> anyhow::Result<String> {
    let converter = DeltaHtmlConverter::from_json(json, options)?;
    Ok(converter.convert())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let json = read_input(cli.input.as_deref())?;
    let html = convert(&json, cli.options())?;

    match &cli.output {
        Some(path) => fs::write(path, &html)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{html}"),
    }
    Ok(())
}
