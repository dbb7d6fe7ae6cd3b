//! TypeScript and JavaScript parser using SWC
//!
//! Global invariants enforced:
//! - Deterministic parsing order
//! - Comments are collected so existing pure markers survive into re-runs

use anyhow::Result;
use swc_common::{
    comments::SingleThreadedComments, sync::Lrc, FileName, SourceFile, SourceMap,
};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// A parsed module together with its comment map and source file handle
///
/// The comment map is required for idempotence: a pure marker present in the
/// input is parsed as a leading comment and must block re-annotation. The
/// source file handle anchors span positions back to byte offsets.
pub struct ParsedSource {
    pub module: Module,
    pub source_file: Lrc<SourceFile>,
    pub comments: SingleThreadedComments,
}

/// Determine the appropriate syntax configuration based on file extension
fn syntax_for_file(filename: &str) -> Syntax {
    if filename.ends_with(".tsx") || filename.ends_with(".mtsx") || filename.ends_with(".ctsx") {
        // TypeScript with JSX (TSX)
        Syntax::Typescript(swc_ecma_parser::TsSyntax {
            tsx: true,
            decorators: false,
            dts: false,
            ..Default::default()
        })
    } else if filename.ends_with(".ts") || filename.ends_with(".mts") || filename.ends_with(".cts")
    {
        let is_dts = filename.ends_with(".d.ts");
        Syntax::Typescript(swc_ecma_parser::TsSyntax {
            tsx: false,
            decorators: false,
            dts: is_dts,
            ..Default::default()
        })
    } else if filename.ends_with(".jsx") || filename.ends_with(".mjsx") || filename.ends_with(".cjsx")
    {
        // JavaScript with JSX
        Syntax::Es(swc_ecma_parser::EsSyntax {
            jsx: true,
            decorators: false,
            ..Default::default()
        })
    } else {
        // Plain JavaScript (for .js, .mjs, .cjs)
        Syntax::Es(swc_ecma_parser::EsSyntax {
            jsx: false,
            decorators: false,
            ..Default::default()
        })
    }
}

/// Parse TypeScript, JavaScript, JSX, or TSX source code into an AST module
///
/// Syntax is selected by file extension:
/// - `.ts`, `.mts`, `.cts` - TypeScript (dts mode for `.d.ts`)
/// - `.tsx`, `.mtsx`, `.ctsx` - TypeScript with JSX
/// - `.js`, `.mjs`, `.cjs` - JavaScript
/// - `.jsx`, `.mjsx`, `.cjsx` - JavaScript with JSX
///
/// Returns an error if parse errors occur.
pub fn parse_source(src: &str, source_map: &Lrc<SourceMap>, filename: &str) -> Result<ParsedSource> {
    let syntax = syntax_for_file(filename);

    let source_file: Lrc<SourceFile> = source_map.new_source_file(
        FileName::Custom(filename.into()).into(),
        src.to_string(),
    );

    let input = StringInput::from(&*source_file);

    // Collect comments so existing markers are visible to the annotator
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(syntax, EsVersion::Es2022, input, Some(&comments));

    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| {
        let error_msg = e.kind().msg();
        anyhow::anyhow!("Parse error: {}", error_msg)
            .context(format!("Failed to parse source file: {}", filename))
    })?;

    Ok(ParsedSource {
        module,
        source_file,
        comments,
    })
}
