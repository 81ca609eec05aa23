//! Membership edits on the host's `bundles.paths` list.
//!
//! Operates on the parsed host configuration in memory. Only entries equal to
//! the given path are ever touched; everything else keeps its position.

use serde_json::{Map, Value};

const BUNDLES_KEY: &str = "bundles";
const PATHS_KEY: &str = "paths";

/// Make `bundle_dir` appear exactly once (`present = true`) or not at all.
///
/// Returns `Ok(true)` if the configuration changed. Errors describe a
/// configuration whose shape can't hold a bundle list; it is never rewritten
/// in that case.
pub fn set_bundle_path(
    config: &mut Value,
    bundle_dir: &str,
    present: bool,
) -> Result<bool, String> {
    let root = config
        .as_object_mut()
        .ok_or_else(|| "expected a JSON object at the top level".to_string())?;

    if present {
        let paths = paths_for_insert(root)?;
        return Ok(ensure_once(paths, bundle_dir));
    }

    let Some(paths) = paths_for_removal(root)? else {
        return Ok(false);
    };
    let before = paths.len();
    paths.retain(|entry| entry.as_str() != Some(bundle_dir));
    Ok(paths.len() != before)
}

/// Registered bundle directories, in file order. Non-string entries are skipped.
pub fn bundle_paths(config: &Value) -> Vec<String> {
    config
        .get(BUNDLES_KEY)
        .and_then(|bundles| bundles.get(PATHS_KEY))
        .and_then(Value::as_array)
        .map(|paths| {
            paths
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn paths_for_insert(root: &mut Map<String, Value>) -> Result<&mut Vec<Value>, String> {
    let bundles = root
        .entry(BUNDLES_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| format!("`{BUNDLES_KEY}` must be an object"))?;
    bundles
        .entry(PATHS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| format!("`{BUNDLES_KEY}.{PATHS_KEY}` must be an array"))
}

fn paths_for_removal(root: &mut Map<String, Value>) -> Result<Option<&mut Vec<Value>>, String> {
    let Some(bundles) = root.get_mut(BUNDLES_KEY) else {
        return Ok(None);
    };
    let bundles = bundles
        .as_object_mut()
        .ok_or_else(|| format!("`{BUNDLES_KEY}` must be an object"))?;
    let Some(paths) = bundles.get_mut(PATHS_KEY) else {
        return Ok(None);
    };
    paths
        .as_array_mut()
        .map(Some)
        .ok_or_else(|| format!("`{BUNDLES_KEY}.{PATHS_KEY}` must be an array"))
}

fn ensure_once(paths: &mut Vec<Value>, bundle_dir: &str) -> bool {
    let occurrences = paths
        .iter()
        .filter(|entry| entry.as_str() == Some(bundle_dir))
        .count();
    match occurrences {
        0 => {
            paths.push(Value::String(bundle_dir.to_string()));
            true
        }
        1 => false,
        _ => {
            // Keep the first occurrence where it is.
            let mut seen = false;
            paths.retain(|entry| {
                if entry.as_str() != Some(bundle_dir) {
                    return true;
                }
                !std::mem::replace(&mut seen, true)
            });
            true
        }
    }
}
