//! Human-readable rendering of diagnostics.

use std::fmt::Write;

use crate::{
    decompilation::{Decompilation, Decompiler},
    diagnostics::{Diagnostic, Location},
};

impl<D: Decompiler> Decompilation<D> {
    /// Renders `diagnostic` for the log: its header, the reconstructed source lines it
    /// spans, and its original source location if one can be resolved.
    ///
    /// ```text
    /// [CA2100:Warning] Review SQL queries for security vulnerabilities
    ///   41 |         command.CommandText = query;
    ///   ^ Has source mapping: src/Db.cs (17:12-17:40)
    /// ```
    pub fn describe_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "[{}:{}] {}",
            diagnostic.id, diagnostic.severity, diagnostic.message
        );
        if diagnostic.is_suppressed {
            text.push_str("^ diagnostic was suppressed\n");
        }

        let Location::Source { path, span } = &diagnostic.location else {
            return text;
        };

        if let Some(unit) = self.unit_index(path) {
            let source = &self.decompiler.units()[unit].text;
            let first = span.start.line as usize;
            let count = span.end.line.saturating_sub(span.start.line) as usize + 1;
            for (number, line) in source.lines().enumerate().skip(first).take(count) {
                let _ = writeln!(text, "  {} | {}", number, line);
            }
        }

        if let Some(resolved) = self.resolve_original_location(diagnostic) {
            let _ = writeln!(
                text,
                "  ^ Has source mapping: {} ({}:{}-{}:{})",
                resolved.path,
                resolved.start.line,
                resolved.start.character,
                resolved.end.line,
                resolved.end.character
            );
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        decompilation::Decompilation,
        diagnostics::{Diagnostic, LinePosition, LineSpan, Location, Severity},
        metadata::{sequencepoints::SequencePoint, token::Token},
        test::{FakeDecompiler, FakeFunction, FakeSymbols},
    };

    const SOURCE: &str = "class A\n{\n    void M()\n    {\n        Call();\n    }\n}\n";

    fn session() -> Decompilation<FakeDecompiler> {
        let token = Token::method_def(1);
        let decompiler = FakeDecompiler::new("A.cs", SOURCE).with_function(
            (3, 0),
            (6, 5),
            FakeFunction::new(Some(token), vec![0x0, 0x1, 0x6]),
            vec![SequencePoint::new(0x1, 0x6, 5, 8, 5, 15)],
        );
        let symbols = FakeSymbols::default().with(
            token,
            vec![SequencePoint::new(0x0, 0x7, 12, 4, 12, 11).with_document("src/A.cs")],
        );
        Decompilation::new("A.dll", decompiler, Some(Box::new(symbols)), None)
    }

    #[test]
    fn describes_resolved_diagnostic() {
        let diagnostic = Diagnostic::new(
            "CA1000",
            Severity::Warning,
            "Do not call Call",
            Location::source(
                "A.cs",
                LineSpan::new(LinePosition::new(4, 8), LinePosition::new(4, 14)),
            ),
        );

        let text = session().describe_diagnostic(&diagnostic);
        assert_eq!(
            text,
            "[CA1000:Warning] Do not call Call\n  4 |         Call();\n  ^ Has source mapping: src/A.cs (12:4-12:11)\n"
        );
    }

    #[test]
    fn describes_suppressed_diagnostic_without_location() {
        let mut diagnostic =
            Diagnostic::new("CS8019", Severity::Hidden, "Unnecessary using", Location::None);
        diagnostic.is_suppressed = true;

        let text = session().describe_diagnostic(&diagnostic);
        assert_eq!(
            text,
            "[CS8019:Hidden] Unnecessary using\n^ diagnostic was suppressed\n"
        );
    }
}
