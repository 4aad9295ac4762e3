use super::adapter::{AdapterVariant, ToolchainAdapter};
use super::bridge::InterpreterBridge;
use super::compile::CompileThenRun;
use super::script::ScriptInterpreter;
use super::template::CommandTemplate;
use crate::language::LanguageTag;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed entry unit name compiled snippets are expected to declare
pub const ENTRY_UNIT: &str = "TempProgram";

const JDK_HINT: &str = "Install a JDK that provides javac and java (e.g. https://adoptium.net/) and add it to PATH.";
const KOTLIN_HINT: &str = "Install the Kotlin compiler (kotlinc and kotlin, https://kotlinlang.org/docs/command-line.html) and add it to PATH.";
const NODE_HINT: &str = "Install Node.js (https://nodejs.org/) so that `node` is on PATH.";
const R_HINT: &str = "Install R (https://cran.r-project.org/) so that `Rscript` is on PATH.";
const PYTHON_HINT: &str = "Install Python 3 (https://www.python.org/downloads/) so that `python` or `python3` is on PATH.";
const MICROPYTHON_HINT: &str = "Install the MicroPython unix port (https://micropython.org/download/) so that `micropython` is on PATH.";

/// Maps each language tag to the adapter that runs it. Built once, then read-only.
#[derive(Debug, Clone, Default)]
pub struct ToolchainRegistry {
    adapters: HashMap<LanguageTag, Arc<ToolchainAdapter>>,
}

impl ToolchainRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(
            LanguageTag::Java,
            ToolchainAdapter::CompileThenRun(CompileThenRun::new(
                CommandTemplate::new(["javac"], ["{file}"]),
                CommandTemplate::new(["java"], ["-cp", "{dir}", "{entry}"]),
                format!("{}.java", ENTRY_UNIT),
                ENTRY_UNIT,
                JDK_HINT,
            )),
        );
        registry.register(
            LanguageTag::Kotlin,
            ToolchainAdapter::CompileThenRun(CompileThenRun::new(
                CommandTemplate::new(["kotlinc"], ["{file}", "-d", "{dir}"]),
                CommandTemplate::new(["kotlin"], ["-cp", "{dir}", "{entry}"]),
                format!("{}.kt", ENTRY_UNIT),
                format!("{}Kt", ENTRY_UNIT),
                KOTLIN_HINT,
            )),
        );
        registry.register(
            LanguageTag::JavaScript,
            ToolchainAdapter::ScriptInterpreter(ScriptInterpreter::new(
                CommandTemplate::new(["node"], ["-e", "{snippet}"]),
                NODE_HINT,
            )),
        );
        registry.register(
            LanguageTag::R,
            ToolchainAdapter::ScriptInterpreter(ScriptInterpreter::new(
                CommandTemplate::new(["Rscript"], ["-e", "{snippet}"]),
                R_HINT,
            )),
        );
        registry.register(
            LanguageTag::Python,
            ToolchainAdapter::ScriptInterpreter(ScriptInterpreter::new(
                CommandTemplate::new(["python", "python3"], ["-c", "{snippet}"]),
                PYTHON_HINT,
            )),
        );
        registry.register(
            LanguageTag::MicroPython,
            ToolchainAdapter::ScriptInterpreter(ScriptInterpreter::new(
                CommandTemplate::new(["micropython"], ["-c", "{snippet}"]),
                MICROPYTHON_HINT,
            )),
        );

        registry
    }

    /// Runs Python through an interpreter fed over stdin instead of `-c`
    pub fn with_python_bridge(mut self) -> Self {
        self.register(
            LanguageTag::Python,
            ToolchainAdapter::InProcessInterpreter(InterpreterBridge::new(
                CommandTemplate::new(["python", "python3"], ["-"]),
                PYTHON_HINT,
            )),
        );
        self
    }

    /// Adds or replaces the adapter for `tag`
    pub fn register(&mut self, tag: LanguageTag, adapter: ToolchainAdapter) {
        self.adapters.insert(tag, Arc::new(adapter));
    }

    pub fn get(&self, tag: LanguageTag) -> Option<Arc<ToolchainAdapter>> {
        self.adapters.get(&tag).cloned()
    }

    pub fn variant_of(&self, tag: LanguageTag) -> Option<AdapterVariant> {
        self.adapters.get(&tag).map(|a| a.variant())
    }

    /// Registered languages, sorted for stable output
    pub fn languages(&self) -> Vec<LanguageTag> {
        let mut tags: Vec<LanguageTag> = self.adapters.keys().copied().collect();
        tags.sort();
        tags
    }
}
