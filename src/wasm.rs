use crate::command::VertMatch;
use crate::kdtree::KdTree;
use crate::options::MatchOptions;
use crate::point::{from_flat, to_flat, Point3};
use wasm_bindgen::prelude::*;
use js_sys::Function;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_MATCH: &'static str = r#"
export const LARGE_INPUT_THRESHOLD = 10000;
"#;

// --- KdTree ---

/// WASM wrapper for a k-d tree over 3D points.
#[wasm_bindgen(js_name = KdTree3D)]
pub struct KdTree3D {
    inner: KdTree,
}

#[wasm_bindgen(js_class = KdTree3D)]
impl KdTree3D {
    /// Builds a tree from a flat array of coordinates `[x, y, z, x, y, z, ...]`.
    #[wasm_bindgen(constructor)]
    pub fn new(points: &[f64]) -> KdTree3D {
        KdTree3D { inner: KdTree::build(&from_flat(points)) }
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize { self.inner.len() }

    #[wasm_bindgen(getter)]
    pub fn depth(&self) -> usize { self.inner.depth() }

    /// Closest stored point as `[x, y, z]`, or `undefined` for an empty tree.
    pub fn nearest(&self, x: f64, y: f64, z: f64) -> Option<Vec<f64>> {
        self.inner.nearest(&[x, y, z]).map(|p| p.to_vec())
    }
}

// --- VertMatch ---

/// WASM wrapper around the undoable match command with in-memory point groups.
///
/// The first group added is the target group, every later group is reference geometry.
#[wasm_bindgen(js_name = VertMatch3D)]
pub struct VertMatch3D {
    groups: Vec<Vec<Point3>>,
    command: VertMatch,
}

#[wasm_bindgen(js_class = VertMatch3D)]
impl VertMatch3D {
    #[wasm_bindgen(constructor)]
    pub fn new(mirror: bool) -> VertMatch3D {
        VertMatch3D {
            groups: Vec::new(),
            command: VertMatch::new(MatchOptions::default().with_mirror(mirror)),
        }
    }

    /// Appends a group from a flat array of coordinates.
    pub fn add_group(&mut self, points: &[f64]) {
        self.groups.push(from_flat(points));
    }

    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    /// Sets the mirror flag for the next `matchPoints`. `undo` and `redo` keep
    /// working on the last match with the flag it ran with.
    pub fn set_mirror(&mut self, mirror: bool) {
        self.command.set_mirror(mirror);
    }

    #[wasm_bindgen(getter)]
    pub fn mirror(&self) -> bool { self.command.options().mirror }

    #[wasm_bindgen(getter)]
    pub fn group_count(&self) -> usize { self.groups.len() }

    /// Runs the match. For large inputs `confirm(count)` is called and must
    /// return `true` to proceed; without a callback large inputs proceed.
    /// Returns the number of points moved.
    #[wasm_bindgen(js_name = matchPoints)]
    pub fn match_points(&mut self, confirm: Option<Function>) -> Result<usize, JsValue> {
        let ask = |count: usize| match &confirm {
            Some(func) => func
                .call1(&JsValue::NULL, &JsValue::from_f64(count as f64))
                .map(|res| res.as_bool().unwrap_or(false))
                .unwrap_or(false),
            None => true,
        };
        self.command
            .do_it(&mut self.groups, ask)
            .map(|summary| summary.moved)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        self.command
            .undo_it(&mut self.groups)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn redo(&mut self) -> Result<usize, JsValue> {
        self.command
            .redo_it(&mut self.groups)
            .map(|summary| summary.moved)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current target positions as a flat array.
    #[wasm_bindgen(getter)]
    pub fn target_positions(&self) -> Vec<f64> {
        self.groups.first().map(|g| to_flat(g)).unwrap_or_default()
    }
}
