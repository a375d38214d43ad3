//! Transforming backend search responses into retrieved memories.

use mcore::RetrievedMemory;
use serde_json::Value;

/// Default tag for memories the backend left untagged.
const UNTAGGED: &str = "未分类";

/// Transform a search response's `data` into retrieved memories.
///
/// Walks `data.text_mem[].memories[]`. Entries without memory text are
/// skipped; a missing confidence defaults to 0.99 (clamped to `[0, 1]`),
/// missing tags to a single untagged marker.
pub fn transform_search_results(data: Option<&Value>) -> Vec<RetrievedMemory> {
    let mut results = Vec::new();
    let Some(cubes) = data.and_then(|d| d.get("text_mem")).and_then(Value::as_array) else {
        return results;
    };

    for cube in cubes {
        let cube_id = cube.get("cube_id").and_then(Value::as_str);
        let Some(memories) = cube.get("memories").and_then(Value::as_array) else {
            continue;
        };
        for memory in memories {
            let Some(text) = memory.get("memory").and_then(Value::as_str) else {
                continue;
            };
            let metadata = memory.get("metadata");
            let confidence = metadata
                .and_then(|m| m.get("confidence"))
                .and_then(Value::as_f64)
                .unwrap_or(0.99)
                .clamp(0.0, 1.0) as f32;
            let tags = metadata
                .and_then(|m| m.get("tags"))
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_else(|| vec![UNTAGGED.to_owned()]);

            results.push(RetrievedMemory {
                text: text.to_owned(),
                confidence,
                tags,
                id: memory.get("id").and_then(Value::as_str).map(Into::into),
                cube_id: cube_id.map(Into::into),
            });
        }
    }

    results
}
