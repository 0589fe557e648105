use thiserror::Error;

use crate::view::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("invalid value for `{property}`: {value}")]
    InvalidValue {
        property: &'static str,
        value: String,
    },
    #[error("invalid color literal `{0}`")]
    InvalidColor(String),
    #[error("unknown easing function `{0}`")]
    UnknownEasing(String),
}

impl StyleError {
    pub(crate) fn invalid(property: &'static str, value: impl std::fmt::Debug) -> Self {
        Self::InvalidValue {
            property,
            value: format!("{value:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0:?} does not exist")]
    Missing(NodeId),
    #[error("node {0:?} is not attached to a ui")]
    Detached(NodeId),
    #[error("node {0:?} already has a parent")]
    AlreadyParented(NodeId),
    #[error("adopting {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("the root node {0:?} cannot be adopted")]
    Root(NodeId),
}
