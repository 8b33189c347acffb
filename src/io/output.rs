use crate::core::{ClassStats, MoodReport};
use colored::*;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &MoodReport) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

const STATS_HEADERS: [&str; 7] = [
    "Class",
    "Inheritance Depth",
    "N-Children",
    "N-Inherited",
    "N-Overridden",
    "N-Visible",
    "N-Private",
];

fn stats_row(name: &str, stats: &ClassStats) -> Vec<String> {
    vec![
        name.to_string(),
        stats.inheritance_depth.to_string(),
        stats.child_count.to_string(),
        stats.inherited_methods.to_string(),
        stats.overridden_methods.to_string(),
        stats.visible_methods.to_string(),
        stats.private_methods.to_string(),
    ]
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &MoodReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &MoodReport) -> anyhow::Result<()> {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(STATS_HEADERS.to_vec());
        for (class, stats) in &report.classes {
            table.add_row(stats_row(class.name(), stats));
        }
        writeln!(self.writer, "{table}")?;

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "MOOD factors".bold())?;
        writeln!(
            self.writer,
            "  Polymorphism Factor:       {:.3}",
            report.factors.polymorphism_factor
        )?;
        writeln!(
            self.writer,
            "  Method Inheritance Factor: {:.3}",
            report.factors.method_inheritance_factor
        )?;
        writeln!(
            self.writer,
            "  Closed Methods Factor:     {:.3}",
            report.factors.closed_methods_factor
        )?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_class_table(&mut self, report: &MoodReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Class Statistics")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| {} |", STATS_HEADERS.join(" | "))?;
        writeln!(self.writer, "|{}", "---|".repeat(STATS_HEADERS.len()))?;
        for (class, stats) in &report.classes {
            writeln!(self.writer, "| {} |", stats_row(class.name(), stats).join(" | "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_factors(&mut self, report: &MoodReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## MOOD Factors")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Factor | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Polymorphism Factor | {:.3} |",
            report.factors.polymorphism_factor
        )?;
        writeln!(
            self.writer,
            "| Method Inheritance Factor | {:.3} |",
            report.factors.method_inheritance_factor
        )?;
        writeln!(
            self.writer,
            "| Closed Methods Factor | {:.3} |",
            report.factors.closed_methods_factor
        )?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &MoodReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# MOOD Metrics Report")?;
        writeln!(self.writer)?;
        self.write_class_table(report)?;
        self.write_factors(report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassId, MoodFactors};
    use std::collections::BTreeMap;

    fn report() -> MoodReport {
        let mut classes = BTreeMap::new();
        classes.insert(
            ClassId::from("Widget"),
            ClassStats {
                inheritance_depth: 1,
                child_count: 2,
                inherited_methods: 3,
                overridden_methods: 1,
                visible_methods: 4,
                private_methods: 1,
            },
        );
        MoodReport {
            classes,
            factors: MoodFactors {
                polymorphism_factor: 0.5,
                method_inheritance_factor: 0.25,
                closed_methods_factor: 0.2,
            },
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        match format {
            OutputFormat::Json => JsonWriter::new(&mut buffer).write_report(&report()).unwrap(),
            OutputFormat::Markdown => MarkdownWriter::new(&mut buffer)
                .write_report(&report())
                .unwrap(),
            OutputFormat::Terminal => TerminalWriter::new(&mut buffer)
                .write_report(&report())
                .unwrap(),
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn json_output_round_trips() {
        let rendered = render(OutputFormat::Json);
        let back: MoodReport = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, report());
    }

    #[test]
    fn terminal_output_lists_class_and_factors() {
        let rendered = render(OutputFormat::Terminal);
        assert!(rendered.contains("Widget"));
        assert!(rendered.contains("Polymorphism Factor"));
        assert!(rendered.contains("0.500"));
    }

    #[test]
    fn markdown_output_has_both_tables() {
        let rendered = render(OutputFormat::Markdown);
        assert!(rendered.contains("## Class Statistics"));
        assert!(rendered.contains("| Widget | 1 | 2 | 3 | 1 | 4 | 1 |"));
        assert!(rendered.contains("| Closed Methods Factor | 0.200 |"));
    }
}
