//! `parcelgen inspect` — explain a structural subtype query.

use std::path::PathBuf;

use anyhow::anyhow;
use parcelgen_model::{DeclKind, Type, TypeId, TypeModel, TypeReflection};

use super::load_model;
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(
    model_path: PathBuf,
    ty: String,
    target: String,
    color: Option<String>,
) -> anyhow::Result<()> {
    let model = load_model(&model_path)?;
    let decl = model
        .lookup(&ty)
        .ok_or_else(|| anyhow!("Type '{}' is not declared in {}", ty, model_path.display()))?;

    let reflection = TypeReflection::new(&model);
    let self_ty = reflection.declaration_type(decl)?;
    let is_subtype = reflection.is_subtype_of(self_ty, &target);

    let mut out = StyledOutput::new(resolve_color_choice(color.as_deref()));
    out.bold(&ty);
    if is_subtype {
        out.plain(" is a subtype of ");
        out.success(&target);
    } else {
        out.plain(" is not a subtype of ");
        out.error(&target);
    }
    out.newline();
    out.newline();
    out.plain("Hierarchy:");
    out.newline();
    print_hierarchy(&mut out, &model, self_ty, &target, 1, None)?;
    Ok(())
}

/// One line per supertype, superclass first, then interfaces
fn print_hierarchy(
    out: &mut StyledOutput,
    model: &TypeModel,
    ty: TypeId,
    target: &str,
    depth: usize,
    relation: Option<&str>,
) -> anyhow::Result<()> {
    let name = model.canonical_name(ty)?;
    out.plain(&"  ".repeat(depth));
    if let Some(relation) = relation {
        out.dim(&format!("{relation} "));
    }
    if name == target {
        out.success(&name);
    } else {
        out.plain(&name);
    }
    out.newline();

    let Some(declared) = model.get(ty).and_then(Type::as_declared) else {
        return Ok(());
    };
    let decl = model.decl(declared.decl)?;
    if let Some(superclass) = decl.superclass {
        print_hierarchy(out, model, superclass, target, depth + 1, Some("extends"))?;
    }
    let relation = if decl.kind == DeclKind::Interface {
        "extends"
    } else {
        "implements"
    };
    for &interface in &decl.interfaces {
        print_hierarchy(out, model, interface, target, depth + 1, Some(relation))?;
    }
    Ok(())
}
