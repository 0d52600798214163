/// Minimal GLSL declaration scanner
///
/// Finds top-level `in`, `uniform` and `buffer` declarations in assembled
/// stage sources. Backends use it to name storage blocks (which have no
/// portable enumeration query) and the mock device uses it to fake reflection.

/// Storage qualifier of a scanned declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// Stage input (`in vec3 InPosition;`)
    Input,
    /// Default-block uniform (`uniform mat4 MatrW;`)
    Uniform,
    /// Shader-storage block (`buffer Primitive { ... };`)
    StorageBlock,
}

/// One scanned declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// GLSL type name (empty for storage blocks)
    pub type_name: String,
    pub name: String,
    /// Explicit `layout(binding = N)` / `layout(location = N)` value
    pub layout_value: Option<u32>,
}

/// Scan a stage source for declarations, in source order
///
/// Only handles one declaration per line, which is how engine shaders are written.
pub fn scan_declarations(source: &str) -> Vec<Declaration> {
    let mut out = Vec::new();

    for raw in source.lines() {
        let line = match raw.find("//") {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (layout_value, rest) = split_layout(line);
        let mut words = rest
            .split(|c: char| c.is_whitespace() || c == ';' || c == '{')
            .filter(|w| !w.is_empty());

        // Skip interpolation / precision qualifiers
        let mut qualifier = words.next();
        while matches!(qualifier, Some("flat" | "smooth" | "noperspective" | "readonly" | "writeonly" | "coherent" | "restrict")) {
            qualifier = words.next();
        }

        match qualifier {
            Some("in") => {
                if let (Some(ty), Some(name)) = (words.next(), words.next()) {
                    out.push(Declaration {
                        kind: DeclarationKind::Input,
                        type_name: ty.to_string(),
                        name: strip_array(name),
                        layout_value,
                    });
                }
            }
            Some("uniform") => {
                if let (Some(ty), Some(name)) = (words.next(), words.next()) {
                    out.push(Declaration {
                        kind: DeclarationKind::Uniform,
                        type_name: ty.to_string(),
                        name: strip_array(name),
                        layout_value,
                    });
                }
            }
            Some("buffer") => {
                if let Some(name) = words.next() {
                    out.push(Declaration {
                        kind: DeclarationKind::StorageBlock,
                        type_name: String::new(),
                        name: name.to_string(),
                        layout_value,
                    });
                }
            }
            _ => {}
        }
    }

    out
}

/// Split `layout(...)` off the front of a line, returning its single integer value
fn split_layout(line: &str) -> (Option<u32>, &str) {
    if !line.starts_with("layout") {
        return (None, line);
    }
    let (Some(open), Some(close)) = (line.find('('), line.find(')')) else {
        return (None, line);
    };
    if close < open {
        return (None, line);
    }
    let value = line[open + 1..close]
        .split(',')
        .filter_map(|part| part.split('=').nth(1))
        .find_map(|v| v.trim().parse::<u32>().ok());
    (value, line[close + 1..].trim_start())
}

fn strip_array(name: &str) -> String {
    match name.find('[') {
        Some(pos) => name[..pos].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
#[path = "glsl_scan_tests.rs"]
mod tests;
