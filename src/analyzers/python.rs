use crate::core::{ClassId, Member};
use crate::hierarchy::{ClassDecl, ClassModel, ModelBuilder};
use anyhow::{Context, Result};
use rustpython_parser::ast;
use std::path::Path;
use walkdir::WalkDir;

/// Derives the class model from Python source. Mirrors what runtime
/// reflection over the imported module would report: module-level classes,
/// their base lists, their declared methods and class attributes, with
/// `__name`-style identifiers mangled to `_<ClassName>__name`.
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract from a single `.py` file or every `.py` file under a
    /// directory, walked in stable name order.
    pub fn extract_path(&self, path: &Path) -> Result<ClassModel> {
        let mut builder = ModelBuilder::new();

        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                let is_python = entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "py");
                if is_python {
                    self.extract_file(entry.path(), &mut builder)?;
                }
            }
        } else {
            self.extract_file(path, &mut builder)?;
        }

        if builder.is_empty() {
            log::warn!("no classes found under {}", path.display());
        }
        Ok(builder.build())
    }

    fn extract_file(&self, path: &Path, builder: &mut ModelBuilder) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for decl in self.extract_source(&content, path)? {
            builder.declare(decl);
        }
        Ok(())
    }

    /// Parse one source text and return the classes it declares at module
    /// level, in source order.
    pub fn extract_source(&self, content: &str, path: &Path) -> Result<Vec<ClassDecl>> {
        let module = rustpython_parser::parse(content, rustpython_parser::Mode::Module, "<module>")
            .map_err(|e| anyhow::anyhow!("Python parse error in {}: {e:?}", path.display()))?;

        let mut decls = Vec::new();
        if let ast::Mod::Module(module) = module {
            for stmt in &module.body {
                if let ast::Stmt::ClassDef(class_def) = stmt {
                    decls.push(extract_class(class_def));
                }
            }
        }
        log::debug!("{}: {} classes", path.display(), decls.len());
        Ok(decls)
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_class(class_def: &ast::StmtClassDef) -> ClassDecl {
    let class_name = class_def.name.to_string();
    let bases: Vec<ClassId> = class_def
        .bases
        .iter()
        .filter_map(expr_to_name)
        .map(ClassId::new)
        .collect();

    let mut members = Vec::new();
    for stmt in &class_def.body {
        match stmt {
            ast::Stmt::FunctionDef(func_def) => {
                members.push(Member::method(mangle(&func_def.name.to_string(), &class_name)));
            }
            ast::Stmt::AsyncFunctionDef(func_def) => {
                members.push(Member::method(mangle(&func_def.name.to_string(), &class_name)));
            }
            ast::Stmt::Assign(assign) => {
                for target in &assign.targets {
                    if let Some(name) = expr_to_name(target) {
                        members.push(Member::attribute(mangle(&name, &class_name)));
                    }
                }
            }
            ast::Stmt::AnnAssign(ann_assign) => {
                if let Some(name) = expr_to_name(&ann_assign.target) {
                    members.push(Member::attribute(mangle(&name, &class_name)));
                }
            }
            _ => {}
        }
    }

    ClassDecl {
        name: ClassId::new(class_name),
        bases,
        members,
    }
}

/// Apply Python's private-name mangling: two leading underscores and no
/// trailing `__` turn `__name` declared in `C` into `_C__name`, which is the
/// name reflection reports. Everything else passes through unchanged.
fn mangle(name: &str, class_name: &str) -> String {
    if name.starts_with("__") && !name.ends_with("__") {
        format!("_{}{}", class_name.trim_start_matches('_'), name)
    } else {
        name.to_string()
    }
}

/// Convert a base-class expression to a (possibly dotted) name. Dotted bases
/// refer outside the module and end up unresolved, which the model treats as
/// the hierarchy root.
fn expr_to_name(expr: &ast::Expr) -> Option<String> {
    match expr {
        ast::Expr::Name(name) => Some(name.id.to_string()),
        ast::Expr::Attribute(attr) => {
            let base = expr_to_name(&attr.value)?;
            Some(format!("{}.{}", base, attr.attr))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn extract(code: &str) -> Vec<ClassDecl> {
        PythonExtractor::new()
            .extract_source(code, Path::new("test.py"))
            .unwrap()
    }

    #[test]
    fn extracts_classes_in_source_order() {
        let decls = extract(indoc! {"
            class First:
                pass

            class Second:
                pass
        "});
        let names: Vec<&str> = decls.iter().map(|d| d.name.name()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn extracts_bases_including_dotted() {
        let decls = extract(indoc! {"
            class Handler(Base, abc.ABC):
                pass
        "});
        assert_eq!(
            decls[0].bases,
            vec![ClassId::from("Base"), ClassId::from("abc.ABC")]
        );
    }

    #[test]
    fn methods_are_callable_and_attributes_are_not() {
        let decls = extract(indoc! {"
            class Service:
                retries = 3

                def start(self):
                    pass

                async def poll(self):
                    pass
        "});
        let members = &decls[0].members;
        assert_eq!(members.len(), 3);
        assert!(!members[0].is_callable); // retries
        assert!(members[1].is_callable); // start
        assert!(members[2].is_callable); // poll
    }

    #[test]
    fn double_underscore_names_are_mangled() {
        let decls = extract(indoc! {"
            class Vault:
                def __secret(self):
                    pass

                def __init__(self):
                    pass

                def _single(self):
                    pass
        "});
        let names: Vec<&str> = decls[0].members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["_Vault__secret", "__init__", "_single"]);
    }

    #[test]
    fn mangling_strips_leading_underscores_of_class_name() {
        assert_eq!(mangle("__secret", "_Private"), "_Private__secret");
        assert_eq!(mangle("__init__", "Widget"), "__init__");
        assert_eq!(mangle("plain", "Widget"), "plain");
    }

    #[test]
    fn nested_and_function_local_classes_are_skipped() {
        let decls = extract(indoc! {"
            class Outer:
                class Inner:
                    pass

            def factory():
                class Local:
                    pass
        "});
        let names: Vec<&str> = decls.iter().map(|d| d.name.name()).collect();
        assert_eq!(names, vec!["Outer"]);
    }

    #[test]
    fn parse_error_reports_the_path() {
        let err = PythonExtractor::new()
            .extract_source("class :", Path::new("broken.py"))
            .unwrap_err();
        assert!(err.to_string().contains("broken.py"));
    }
}
