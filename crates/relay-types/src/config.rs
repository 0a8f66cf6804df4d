// URL paths served by a pipeline node, one per operation.

use crate::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPaths {
    pub predict: String,
    pub transform_input: String,
    pub transform_output: String,
    pub route: String,
    /// Combiner nodes conventionally serve this as `/aggregate`.
    pub combine: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            predict: "/predict".into(),
            transform_input: "/transform-input".into(),
            transform_output: "/transform-output".into(),
            route: "/route".into(),
            combine: "/aggregate".into(),
        }
    }
}

impl EndpointPaths {
    pub fn path_for(&self, op: Operation) -> &str {
        match op {
            Operation::Predict => &self.predict,
            Operation::TransformInput => &self.transform_input,
            Operation::TransformOutput => &self.transform_output,
            Operation::Route => &self.route,
            Operation::Combine => &self.combine,
        }
    }

    /// Every path must start with `/`, which also rules out empty paths.
    pub fn validate(&self) -> Result<(), String> {
        for op in Operation::ALL {
            let path = self.path_for(op);
            if !path.starts_with('/') {
                return Err(format!("path for {op} must start with '/', got {path:?}"));
            }
        }
        Ok(())
    }
}
