//! Error codes for the drawnet diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Document loading
//! - `E1xx` - Shape classification
//! - `E2xx` - Reference resolution
//! - `E3xx` - Topology building

use std::fmt;

use drawnet_core::topology::Stage;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Malformed document.
    ///
    /// The diagram source is not well-formed XML.
    E001,

    /// Empty document.
    ///
    /// The document contains no `mxCell` with a `style` attribute, so there is
    /// nothing to classify.
    E002,

    /// Compressed diagram.
    ///
    /// A `<diagram>` element carries an encoded payload instead of an inline
    /// `<mxGraphModel>`. Export the diagram uncompressed.
    E003,

    // =========================================================================
    // Classification Errors (E1xx)
    // =========================================================================
    /// Ambiguous shape classification.
    ///
    /// A cell style matches both the router pattern and the network pattern.
    /// This is a configuration error: the two patterns must be disjoint.
    E100,

    /// Empty shape label.
    ///
    /// A router or network shape has no visible name; a fallback name is used.
    E101,

    // =========================================================================
    // Resolution Errors (E2xx)
    // =========================================================================
    /// Dangling edge endpoint.
    ///
    /// An edge references a `source` or `target` cell that does not exist.
    E200,

    /// Dangling edge-label parent.
    ///
    /// An edge-label references a parent cell that does not exist.
    E201,

    /// Edge-label parent is not an edge.
    ///
    /// An edge-label is attached to a cell that is not an edge; its text is ignored.
    E202,

    // =========================================================================
    // Topology Errors (E3xx)
    // =========================================================================
    /// No routers.
    E300,

    /// No links.
    E301,

    /// No networks.
    E302,

    /// Unparseable subnet.
    ///
    /// A label token is not a CIDR block. It is kept as a placeholder and never
    /// emitted.
    E303,

    /// Edge dropped.
    ///
    /// Neither endpoint of an edge resolved to a router or network shape.
    E304,

    /// Unusable network attachment.
    ///
    /// An edge touches a network shape but its other endpoint is not a router.
    E305,
}

impl ErrorCode {
    /// Returns the code reported when `stage` produced no entities.
    pub fn stage_empty(stage: Stage) -> Self {
        match stage {
            Stage::Routers => ErrorCode::E300,
            Stage::Links => ErrorCode::E301,
            Stage::Networks => ErrorCode::E302,
        }
    }

    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E305 => "E305",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E303.to_string(), "E303");
    }

    #[test]
    fn test_stage_empty_codes_are_distinct() {
        let codes = [
            ErrorCode::stage_empty(Stage::Routers),
            ErrorCode::stage_empty(Stage::Links),
            ErrorCode::stage_empty(Stage::Networks),
        ];
        assert_eq!(codes, [ErrorCode::E300, ErrorCode::E301, ErrorCode::E302]);
    }
}
