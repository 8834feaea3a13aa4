use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tyinfer_solver::{
    Applicability, Binding, MethodInfo, RankedCandidate, Substitution, TypeFormatter,
};

use super::driver::CallReport;
use crate::scenario::Scenario;

pub struct Reporter<'a> {
    scenario: &'a Scenario,
    formatter: TypeFormatter<'a>,
    color: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(scenario: &'a Scenario, color: bool) -> Self {
        Reporter {
            scenario,
            formatter: TypeFormatter::new(&scenario.store),
            color,
        }
    }

    pub fn render_text(&self, reports: &[CallReport]) -> String {
        let mut out = String::new();
        for (index, report) in reports.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_call(report));
        }
        out
    }

    /// ```text
    /// call c1: 2 candidates
    ///   * exact     <T> T id(T)  {T -> Integer}
    ///     boxing    int id(int)
    ///   result: Integer
    /// ```
    pub fn format_call(&self, report: &CallReport) -> String {
        let resolution = &report.resolution;
        let header = format!(
            "call {}: {} candidate{}",
            report.name,
            resolution.candidates.len(),
            if resolution.candidates.len() == 1 { "" } else { "s" }
        );
        let mut output = self.paint(&header, |text| text.bold().to_string());
        output.push('\n');

        let best = resolution.best().len();
        for (index, candidate) in resolution.candidates.iter().enumerate() {
            let marker = if index < best {
                self.paint("*", |text| text.green().bold().to_string())
            } else {
                " ".to_string()
            };
            output.push_str("  ");
            output.push_str(&marker);
            output.push(' ');
            output.push_str(&self.format_applicability(candidate.applicability));
            output.push(' ');
            output.push_str(&self.signature(candidate));
            if !candidate.substitution.is_empty() {
                output.push_str("  ");
                output.push_str(&self.formatter.format_substitution(&candidate.substitution));
            }
            if !candidate.accessible {
                output.push(' ');
                output.push_str(&self.paint("(inaccessible)", |text| text.yellow().to_string()));
            }
            output.push('\n');
        }

        if resolution.candidates.is_empty() || best == 0 {
            output.push_str("  ");
            output.push_str(&self.paint("no applicable candidate", |text| {
                text.red().bold().to_string()
            }));
        } else if resolution.is_ambiguous() {
            let note = format!("ambiguous: {best} candidates share the best rank");
            output.push_str("  ");
            output.push_str(&self.paint(&note, |text| text.yellow().bold().to_string()));
        } else {
            let result = report
                .result
                .as_ref()
                .map(|ty| self.formatter.format(ty))
                .unwrap_or_else(|| "<unknown>".to_string());
            output.push_str("  result: ");
            output.push_str(&self.paint(&result, |text| text.cyan().to_string()));
        }
        output.push('\n');
        output
    }

    pub fn render_json(&self, reports: &[CallReport]) -> Result<String> {
        let calls: Vec<JsonCall> = reports.iter().map(|report| self.json_call(report)).collect();
        let mut text =
            serde_json::to_string_pretty(&calls).context("failed to serialize report")?;
        text.push('\n');
        Ok(text)
    }

    fn json_call(&self, report: &CallReport) -> JsonCall {
        let best = report.resolution.best().len();
        JsonCall {
            id: report.name.clone(),
            ambiguous: report.resolution.is_ambiguous(),
            result: report.result.as_ref().map(|ty| self.formatter.format(ty)),
            candidates: report
                .resolution
                .candidates
                .iter()
                .enumerate()
                .map(|(index, candidate)| JsonCandidate {
                    signature: self.signature(candidate),
                    applicability: applicability_label(candidate.applicability),
                    accessible: candidate.accessible,
                    best: index < best,
                    substitution: self.json_substitution(&candidate.substitution),
                })
                .collect(),
        }
    }

    /// Parameter name to type; `null` for a raw binding.
    fn json_substitution(&self, substitution: &Substitution) -> serde_json::Map<String, serde_json::Value> {
        substitution
            .iter()
            .map(|(param, binding)| {
                let value = match binding {
                    Binding::Type(ty) => serde_json::Value::String(self.formatter.format(ty)),
                    Binding::Unbound => serde_json::Value::Null,
                };
                (self.formatter.param_name(param), value)
            })
            .collect()
    }

    fn signature(&self, candidate: &RankedCandidate) -> String {
        match self.scenario.store.method(candidate.method) {
            Some(method) => self.format_signature(&method),
            None => format!("<method#{}>", candidate.method.0),
        }
    }

    /// `<T> List<T> Util.wrap(T, Object...)`
    pub fn format_signature(&self, method: &MethodInfo) -> String {
        let mut out = String::new();
        if !method.type_params.is_empty() {
            let names: Vec<String> = method
                .type_params
                .iter()
                .map(|param| self.formatter.param_name(*param))
                .collect();
            out.push('<');
            out.push_str(&names.join(", "));
            out.push_str("> ");
        }
        out.push_str(&self.formatter.format(&method.return_type));
        out.push(' ');
        if let Some(owner) = method.owner {
            out.push_str(&self.formatter.class_name(owner));
            out.push('.');
        }
        out.push_str(&method.name);

        let params: Vec<String> = method
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let last = index + 1 == method.params.len();
                match param.ty.array_component() {
                    Some(component) if method.is_varargs && last => {
                        format!("{}...", self.formatter.format(component))
                    }
                    _ => self.formatter.format(&param.ty),
                }
            })
            .collect();
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');
        out
    }

    fn format_applicability(&self, applicability: Applicability) -> String {
        let label = format!("{:<9}", applicability_label(applicability));
        if !self.color {
            return label;
        }
        match applicability {
            Applicability::Exact => label.green().to_string(),
            Applicability::Boxing => label.cyan().to_string(),
            Applicability::VarArgs => label.blue().to_string(),
            Applicability::NotApplicable => label.red().dimmed().to_string(),
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

pub fn applicability_label(applicability: Applicability) -> &'static str {
    match applicability {
        Applicability::Exact => "exact",
        Applicability::Boxing => "boxing",
        Applicability::VarArgs => "varargs",
        Applicability::NotApplicable => "inapplicable",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonCall {
    id: String,
    ambiguous: bool,
    result: Option<String>,
    candidates: Vec<JsonCandidate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonCandidate {
    signature: String,
    applicability: &'static str,
    accessible: bool,
    best: bool,
    substitution: serde_json::Map<String, serde_json::Value>,
}
