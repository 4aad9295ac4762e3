use serde::Serialize;
use std::path::Path;

/// An external command with placeholder arguments.
///
/// `programs` lists executable candidates in preference order; the first one
/// that resolves on `PATH` is used. An argument that is exactly `{snippet}`
/// is replaced by the snippet text. `{file}`, `{dir}` and `{entry}` are
/// substituted anywhere inside an argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandTemplate {
    pub programs: Vec<String>,
    pub args: Vec<String>,
}

/// Values available to placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateVars<'a> {
    pub snippet: Option<&'a str>,
    pub file: Option<&'a Path>,
    pub dir: Option<&'a Path>,
    pub entry: Option<&'a str>,
}

impl CommandTemplate {
    pub fn new<P, A>(programs: P, args: A) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            programs: programs.into_iter().map(Into::into).collect(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Name shown in guidance messages, e.g. `python (or python3)`
    pub fn display_programs(&self) -> String {
        match self.programs.split_first() {
            Some((first, [])) => first.clone(),
            Some((first, rest)) => format!("{} (or {})", first, rest.join(", ")),
            None => "<none>".to_string(),
        }
    }

    pub fn render_args(&self, vars: &TemplateVars<'_>) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                if arg == "{snippet}" {
                    return vars.snippet.unwrap_or_default().to_string();
                }
                let mut rendered = arg.clone();
                if let Some(file) = vars.file {
                    rendered = rendered.replace("{file}", &file.display().to_string());
                }
                if let Some(dir) = vars.dir {
                    rendered = rendered.replace("{dir}", &dir.display().to_string());
                }
                if let Some(entry) = vars.entry {
                    rendered = rendered.replace("{entry}", entry);
                }
                rendered
            })
            .collect()
    }
}
