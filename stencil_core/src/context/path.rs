use super::lookup::resolve_with;
use super::Context;
use crate::policy::AccessPolicy;
use crate::value::Value;

/// Split `items[0].title` into `items`, `0`, `title`.
///
/// Returns `None` for empty segments and unbalanced brackets.
pub(crate) fn segments(path: &str) -> Option<Vec<&str>> {
    let mut out = Vec::new();
    for part in path.split('.') {
        let (head, mut rest) = match part.find('[') {
            Some(open) => part.split_at(open),
            None => (part, ""),
        };
        if head.is_empty() && (out.is_empty() || rest.is_empty()) {
            return None;
        }
        if !head.is_empty() {
            if head.contains(']') {
                return None;
            }
            out.push(head);
        }
        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = &rest[1..close];
            if index.is_empty() || index.contains('[') {
                return None;
            }
            out.push(index);
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }
    Some(out)
}

pub(crate) fn lookup(ctx: &Context<'_>, policy: &AccessPolicy, path: &str) -> Option<Value> {
    let path = path.trim();
    if path == "." || path == "this" {
        return Some(ctx.view().clone());
    }

    let segments = segments(path)?;
    let (first, rest) = segments.split_first()?;

    let mut current = if *first == "this" {
        ctx.view().clone()
    } else {
        ctx.scopes()
            .find_map(|scope| resolve_with(policy, scope, first).filter(|v| !v.is_null()))?
    };

    for segment in rest {
        current = resolve_with(policy, &Context::detached(current), segment)?;
    }
    Some(current)
}
