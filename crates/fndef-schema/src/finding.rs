//! # Validation Findings
//!
//! A finding is one reported inconsistency. Findings are data, not errors:
//! every stage returns them and the orchestrator collects them into a
//! [`ValidationReport`], which decides the verdict.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use fndef_core::{AddressWidth, Symbol};
use serde::Serialize;

/// Category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FindingKind {
    /// A function parameter type is not defined anywhere.
    MissingFunctionParameter,
    /// A structure field type is not defined anywhere.
    MissingStructParameter,
    /// A high-level alias target is neither a high-level nor a backing type.
    MissingHighLevelTarget,
    /// A symbol is both a high-level and a backing type.
    AmbiguousHighLevelAndBacking,
    /// A symbol is both a high-level type and a structure.
    AmbiguousHighLevelAndStruct,
    /// A symbol is both a structure and a backing type.
    AmbiguousStructAndBacking,
    /// An alias chain inside one address width revisits a name.
    AliasCycle,
}

impl FindingKind {
    /// Every kind, in reporting order.
    pub const ALL: [FindingKind; 7] = [
        FindingKind::MissingFunctionParameter,
        FindingKind::MissingStructParameter,
        FindingKind::MissingHighLevelTarget,
        FindingKind::AmbiguousHighLevelAndBacking,
        FindingKind::AmbiguousHighLevelAndStruct,
        FindingKind::AmbiguousStructAndBacking,
        FindingKind::AliasCycle,
    ];

    /// Human-readable headline used in diagnostics.
    pub fn headline(self) -> &'static str {
        match self {
            FindingKind::MissingFunctionParameter => {
                "Function parameters with missing definitions"
            }
            FindingKind::MissingStructParameter => {
                "Used struct parameters with missing definitions"
            }
            FindingKind::MissingHighLevelTarget => {
                "Highlevel parameter types with missing definitions"
            }
            FindingKind::AmbiguousHighLevelAndBacking => {
                "Parameters which are defined as both a high level parameter and a backing parameter"
            }
            FindingKind::AmbiguousHighLevelAndStruct => {
                "Parameters which are defined as both a high level parameter and a struct"
            }
            FindingKind::AmbiguousStructAndBacking => {
                "Parameters which are defined as both a struct and a backing parameter"
            }
            FindingKind::AliasCycle => "Highlevel parameter resolution contains ring",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A resolution or ambiguity check that produced a non-empty symbol set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolSetFinding {
    /// Which check fired. Never [`FindingKind::AliasCycle`].
    pub kind: FindingKind,
    /// The offending symbols.
    pub symbols: BTreeSet<Symbol>,
}

/// An alias chain that revisits a name before reaching a terminal type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCycle {
    /// Address width the chain was walked in.
    pub address_width: AddressWidth,
    /// Name the walk started from.
    pub start: Symbol,
    /// Last name before the repeated edge.
    pub from: Symbol,
    /// Previously visited name the repeated edge points back to.
    pub to: Symbol,
    /// Full walk, ending with the revisited name.
    pub chain: Vec<Symbol>,
}

/// One reported inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Finding {
    /// Missing-definition or multi-definition check.
    Symbols(SymbolSetFinding),
    /// Alias cycle within one address width.
    Cycle(AliasCycle),
}

impl Finding {
    /// Build a symbol-set finding, or `None` if the set is empty.
    pub fn from_set(kind: FindingKind, symbols: BTreeSet<Symbol>) -> Option<Self> {
        if symbols.is_empty() {
            None
        } else {
            Some(Finding::Symbols(SymbolSetFinding { kind, symbols }))
        }
    }

    /// Category of this finding.
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::Symbols(f) => f.kind,
            Finding::Cycle(_) => FindingKind::AliasCycle,
        }
    }

    /// Offending symbols. For a cycle, the two names forming the repeated edge.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        match self {
            Finding::Symbols(f) => f.symbols.clone(),
            Finding::Cycle(c) => [c.from.clone(), c.to.clone()].into_iter().collect(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Symbols(finding) => {
                write!(f, "{}: {{", finding.kind.headline())?;
                for (i, symbol) in finding.symbols.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{symbol}'")?;
                }
                f.write_str("}")
            }
            Finding::Cycle(cycle) => {
                let chain: Vec<&str> = cycle.chain.iter().map(Symbol::as_str).collect();
                write!(
                    f,
                    "Highlevel parameter resolution for address width: {} starting from: {} \
                     contains ring between {} and {} ({})",
                    cycle.address_width,
                    cycle.start,
                    cycle.from,
                    cycle.to,
                    chain.join(" -> ")
                )
            }
        }
    }
}

/// Aggregated outcome of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// Wrap an already-ordered list of findings.
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// True if no finding was produced.
    pub fn is_success(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns the number of findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns true if there are no findings.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns a slice of all findings.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Findings of one kind.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind() == kind)
    }

    /// Number of findings per kind; kinds that did not fire are omitted.
    pub fn counts_by_kind(&self) -> BTreeMap<FindingKind, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Finding> {
        self.findings
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, finding) in self.findings.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{finding}")?;
        }
        Ok(())
    }
}
