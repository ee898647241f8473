//! Dataflow artifacts computed by the scanning engine
//!
//! Detected data types, third-party components and per-file processing
//! errors are carried through to the cloud report unchanged.

use serde::{Deserialize, Serialize};

/// Source location a detector matched at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub filename: String,
    pub line_number: usize,
}

/// One detector's evidence for a data type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTypeDetector {
    pub name: String,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// A category of sensitive data observed in the codebase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    pub name: String,
    #[serde(default)]
    pub detectors: Vec<DataTypeDetector>,
}

/// A third-party component (database, API, dependency) the code talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,

    #[serde(rename = "type")]
    pub component_type: String,

    #[serde(default)]
    pub sub_type: Option<String>,

    #[serde(default)]
    pub locations: Vec<Location>,
}

/// A file the engine failed to process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingError {
    pub filename: String,
    pub message: String,
}

/// Dataflow section of the scan results document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataflow {
    #[serde(default)]
    pub data_types: Vec<DataType>,

    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub errors: Vec<ProcessingError>,
}
