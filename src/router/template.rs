use super::RouteError;

/// One compiled segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// Matches any single path segment, capturing it under this name.
    Param(String),
}

/// Compile a template like `/classes/{id}/students` into segments.
///
/// Runs once at registration so dispatch never re-parses template text.
pub(crate) fn compile(template: &str) -> Result<Vec<Segment>, RouteError> {
    let mut segments = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for raw in template.split('/').filter(|s| !s.is_empty()) {
        if let Some(name) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            if name.is_empty() {
                return Err(RouteError::EmptyParam {
                    template: template.to_string(),
                });
            }
            if name.contains('{') || name.contains('}') {
                return Err(RouteError::UnbalancedBraces {
                    template: template.to_string(),
                });
            }
            if seen.contains(&name) {
                return Err(RouteError::DuplicateParam {
                    template: template.to_string(),
                    name: name.to_string(),
                });
            }
            seen.push(name);
            segments.push(Segment::Param(name.to_string()));
        } else {
            // A brace outside a full `{name}` segment is malformed.
            if raw.contains('{') || raw.contains('}') {
                return Err(RouteError::UnbalancedBraces {
                    template: template.to_string(),
                });
            }
            segments.push(Segment::Literal(raw.to_string()));
        }
    }

    Ok(segments)
}

/// Strip the trailing slash and make the empty path explicit.
pub(crate) fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Structural match of a normalized path against compiled segments,
/// returning the captured parameters on success.
pub(crate) fn match_path<'t>(
    segments: &'t [Segment],
    path: &str,
) -> Option<Vec<(&'t str, String)>> {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (segment, part) in segments.iter().zip(parts) {
        match segment {
            Segment::Literal(lit) => {
                if lit != part {
                    return None;
                }
            }
            Segment::Param(name) => params.push((name.as_str(), part.to_string())),
        }
    }
    Some(params)
}

/// Two routes have the same shape when a concrete path can never
/// distinguish them: equal literals, params in the same positions.
pub(crate) fn same_shape(a: &[Segment], b: &[Segment]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| match (x, y) {
            (Segment::Literal(l), Segment::Literal(r)) => l == r,
            (Segment::Param(_), Segment::Param(_)) => true,
            _ => false,
        })
}
