//! Structured install-script statements and their rendering.
//!
//! Generators produce [`Statement`] values; [`ScriptWriter`] is the only
//! place that turns them into script text.

use std::path::Path;

use serde::Serialize;

use crate::install::emitter::{FileInstallEmitter, InstallRule, InstallRuleEmitter};

/// One statement of an install script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    /// `# text`
    Comment { text: String },

    /// `SET(name "value")`
    Set { name: String, value: String },

    /// `IF(condition) ... ENDIF(condition)`
    If {
        condition: String,
        body: Vec<Statement>,
    },

    /// `EXECUTE_PROCESS(COMMAND "program" args...)`
    Execute(ProcessCommand),

    /// The install primitive.
    Install(InstallRule),
}

impl Statement {
    pub fn comment(text: impl Into<String>) -> Self {
        Statement::Comment { text: text.into() }
    }

    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Statement::Set {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn if_block(condition: impl Into<String>, body: Vec<Statement>) -> Self {
        Statement::If {
            condition: condition.into(),
            body,
        }
    }
}

/// An external process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessCommand {
    /// Program path, rendered quoted
    pub program: String,

    /// Arguments, rendered verbatim
    pub args: Vec<String>,

    pub layout: ArgLayout,
}

/// How the arguments of an invocation are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgLayout {
    /// `EXECUTE_PROCESS(COMMAND "p" a b )`
    #[default]
    Inline,
    /// One argument per line, closed right after the last one
    OnePerLine,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ProcessCommand {
            program: program.into(),
            args: Vec::new(),
            layout: ArgLayout::Inline,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn one_per_line(mut self) -> Self {
        self.layout = ArgLayout::OnePerLine;
        self
    }
}

/// Renders statements to script text.
pub struct ScriptWriter<'e> {
    emitter: &'e dyn InstallRuleEmitter,
    out: String,
}

impl ScriptWriter<'static> {
    /// A writer rendering installs with `FILE(INSTALL ...)`.
    pub fn new() -> Self {
        Self::with_emitter(&FileInstallEmitter)
    }
}

impl Default for ScriptWriter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'e> ScriptWriter<'e> {
    pub fn with_emitter(emitter: &'e dyn InstallRuleEmitter) -> Self {
        ScriptWriter {
            emitter,
            out: String::new(),
        }
    }

    /// Append statements at the top level.
    pub fn write(&mut self, statements: &[Statement]) {
        self.write_block(statements, 0);
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn write_block(&mut self, statements: &[Statement], depth: usize) {
        for statement in statements {
            self.write_statement(statement, depth);
        }
    }

    fn write_statement(&mut self, statement: &Statement, depth: usize) {
        let indent = " ".repeat(depth * 2);
        match statement {
            Statement::Comment { text } => {
                self.out.push_str(&format!("{indent}# {text}\n"));
            }
            Statement::Set { name, value } => {
                self.out.push_str(&format!("{indent}SET({name} \"{value}\")\n"));
            }
            Statement::If { condition, body } => {
                self.out.push_str(&format!("{indent}IF({condition})\n"));
                self.write_block(body, depth + 1);
                self.out.push_str(&format!("{indent}ENDIF({condition})\n"));
            }
            Statement::Execute(command) => self.write_command(command, &indent),
            Statement::Install(rule) => {
                let text = self.emitter.emit(rule, &indent);
                self.out.push_str(&text);
            }
        }
    }

    fn write_command(&mut self, command: &ProcessCommand, indent: &str) {
        self.out
            .push_str(&format!("{indent}EXECUTE_PROCESS(COMMAND \"{}\"", command.program));
        match command.layout {
            ArgLayout::Inline => {
                for arg in &command.args {
                    self.out.push(' ');
                    self.out.push_str(arg);
                }
                self.out.push_str(" )\n");
            }
            ArgLayout::OnePerLine => {
                for arg in &command.args {
                    self.out.push_str(&format!("\n{indent}  {arg}"));
                }
                self.out.push_str(")\n");
            }
        }
    }
}

/// Render statements with the default install emitter.
pub fn render(statements: &[Statement]) -> String {
    let mut writer = ScriptWriter::new();
    writer.write(statements);
    writer.finish()
}

/// Quote a value as a script string argument.
pub fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

/// Render a filesystem path for use inside a script (forward slashes).
pub fn script_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_set_and_comment() {
        let text = render(&[
            Statement::comment("Install target: core"),
            Statement::set("core_BUILD_NAME_Debug", "Debug/libcore.so"),
        ]);
        assert_eq!(
            text,
            "# Install target: core\nSET(core_BUILD_NAME_Debug \"Debug/libcore.so\")\n"
        );
    }

    #[test]
    fn test_render_inline_command_in_block() {
        let text = render(&[Statement::if_block(
            "CMAKE_INSTALL_DO_STRIP",
            vec![Statement::Execute(
                ProcessCommand::new("/usr/bin/strip").arg("\"$ENV{DESTDIR}/usr/bin/app\""),
            )],
        )]);
        assert_eq!(
            text,
            "IF(CMAKE_INSTALL_DO_STRIP)\n  \
             EXECUTE_PROCESS(COMMAND \"/usr/bin/strip\" \"$ENV{DESTDIR}/usr/bin/app\" )\n\
             ENDIF(CMAKE_INSTALL_DO_STRIP)\n"
        );
    }

    #[test]
    fn test_render_one_per_line_command() {
        let text = render(&[Statement::if_block(
            "COND",
            vec![Statement::Execute(
                ProcessCommand::new("install_name_tool")
                    .arg("-id \"/usr/lib/libcore.dylib\"")
                    .arg("\"$ENV{DESTDIR}/usr/lib/libcore.dylib\"")
                    .one_per_line(),
            )],
        )]);
        assert_eq!(
            text,
            "IF(COND)\n  EXECUTE_PROCESS(COMMAND \"install_name_tool\"\n    \
             -id \"/usr/lib/libcore.dylib\"\n    \
             \"$ENV{DESTDIR}/usr/lib/libcore.dylib\")\n\
             ENDIF(COND)\n"
        );
    }

    #[test]
    fn test_plan_json_is_tagged() {
        let json = serde_json::to_value(Statement::set("a", "b")).unwrap();
        assert_eq!(json["type"], "set");
        assert_eq!(json["name"], "a");

        let json = serde_json::to_value(Statement::Execute(ProcessCommand::new("strip"))).unwrap();
        assert_eq!(json["type"], "execute");
        assert_eq!(json["layout"], "inline");
    }

    #[test]
    fn test_script_path() {
        assert_eq!(script_path(Path::new("C:\\tools\\strip.exe")), "C:/tools/strip.exe");
    }
}
