//! Fixtures and fake collaborators shared by the unit tests.

use std::{
    cell::Cell,
    collections::HashMap,
};

use crate::{
    decompilation::{DecompiledFunction, Decompiler, SyntaxUnit},
    diagnostics::LinePosition,
    mapping::SyntaxNode,
    metadata::{sequencepoints::SequencePoint, token::Token},
    symbols::SymbolProvider,
    Result,
};

/// Reconstructed-style points, starts `0x0, 0x1, 0x7, 0xc, 0x10` on lines 10-15.
pub fn points_a() -> Vec<SequencePoint> {
    vec![
        SequencePoint::new(0x0, 0x1, 10, 0, 10, 20),
        SequencePoint::new(0x1, 0x7, 11, 0, 12, 20),
        SequencePoint::new(0x7, 0xc, 12, 20, 12, 40),
        SequencePoint::new(0xc, 0x10, 13, 0, 14, 40),
        SequencePoint::new(0x10, 0x12, 15, 0, 15, 1),
    ]
}

/// Original-style points, starts `0x0, 0x1, 0x7, 0xd, 0x10` on lines 20-25, no end offsets.
pub fn points_b() -> Vec<SequencePoint> {
    vec![
        SequencePoint::new(0x0, 0x0, 20, 0, 20, 20),
        SequencePoint::new(0x1, 0x0, 21, 0, 22, 20),
        SequencePoint::new(0x7, 0x0, 22, 20, 22, 40),
        SequencePoint::new(0xd, 0x0, 23, 0, 24, 40),
        SequencePoint::new(0x10, 0x0, 25, 0, 25, 1),
    ]
}

/// A point with only an IL range.
pub fn offset_point(il_offset: u32, il_end: u32) -> SequencePoint {
    SequencePoint::new(il_offset, il_end, 0, 0, 0, 0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFunction {
    pub token: Option<Token>,
    pub instructions: Vec<u32>,
}

impl FakeFunction {
    pub fn new(token: Option<Token>, instructions: Vec<u32>) -> Self {
        FakeFunction {
            token,
            instructions,
        }
    }
}

impl DecompiledFunction for FakeFunction {
    fn identity(&self) -> Option<Token> {
        self.token
    }

    fn instruction_offsets(&self) -> &[u32] {
        &self.instructions
    }
}

struct FakeNodeData {
    unit: usize,
    parent: Option<usize>,
    start: LinePosition,
    end: LinePosition,
    function: Option<FakeFunction>,
}

/// Decompiler over hand-built units. Every function gets an annotated node and an
/// unannotated body node below it spanning the same text.
#[derive(Default)]
pub struct FakeDecompiler {
    units: Vec<SyntaxUnit>,
    nodes: Vec<FakeNodeData>,
    points: Vec<HashMap<Token, Vec<SequencePoint>>>,
    calls: Cell<usize>,
}

impl FakeDecompiler {
    pub fn new(name: &str, text: &str) -> Self {
        FakeDecompiler::default().with_unit(name, text)
    }

    /// A single unit holding one function that covers everything.
    pub fn single_function(token: Token, points: Vec<SequencePoint>) -> Self {
        FakeDecompiler::new("Single.cs", "").with_function(
            (0, 0),
            (u32::MAX, 0),
            FakeFunction::new(Some(token), vec![]),
            points,
        )
    }

    pub fn with_unit(mut self, name: &str, text: &str) -> Self {
        self.units.push(SyntaxUnit::new(name, text));
        self.points.push(HashMap::new());
        self
    }

    /// Adds a function to the last unit; positions use 1-based lines.
    pub fn with_function(
        mut self,
        start: (u32, u32),
        end: (u32, u32),
        function: FakeFunction,
        points: Vec<SequencePoint>,
    ) -> Self {
        let unit = self.units.len() - 1;
        let start = LinePosition::new(start.0, start.1);
        let end = LinePosition::new(end.0, end.1);

        if let Some(token) = function.token {
            self.points[unit].insert(token, points);
        }

        self.nodes.push(FakeNodeData {
            unit,
            parent: None,
            start,
            end,
            function: Some(function),
        });
        let parent = Some(self.nodes.len() - 1);
        self.nodes.push(FakeNodeData {
            unit,
            parent,
            start,
            end,
            function: None,
        });
        self
    }

    pub fn sequence_point_calls(&self) -> usize {
        self.calls.get()
    }
}

#[derive(Clone, Copy)]
pub struct FakeNode<'a> {
    decompiler: &'a FakeDecompiler,
    index: usize,
}

impl SyntaxNode for FakeNode<'_> {
    type Function = FakeFunction;

    fn parent(&self) -> Option<Self> {
        self.decompiler.nodes[self.index]
            .parent
            .map(|index| FakeNode { index, ..*self })
    }

    fn function_annotation(&self) -> Option<FakeFunction> {
        self.decompiler.nodes[self.index].function.clone()
    }
}

impl Decompiler for FakeDecompiler {
    type Function = FakeFunction;
    type Node<'a>
        = FakeNode<'a>
    where
        Self: 'a;

    fn units(&self) -> &[SyntaxUnit] {
        &self.units
    }

    fn node_containing(
        &self,
        unit: usize,
        start: LinePosition,
        end: LinePosition,
    ) -> Option<FakeNode<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.unit == unit && node.start <= start && end <= node.end)
            .max_by_key(|(index, node)| (node.start, *index))
            .map(|(index, _)| FakeNode {
                decompiler: self,
                index,
            })
    }

    fn sequence_points(&self, unit: usize) -> Result<HashMap<Token, Vec<SequencePoint>>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.points.get(unit).cloned().unwrap_or_default())
    }
}

/// Symbol provider over a map that counts its lookups.
#[derive(Default)]
pub struct FakeSymbols {
    points: HashMap<Token, Vec<SequencePoint>>,
    lookups: Cell<usize>,
}

impl FakeSymbols {
    pub fn with(mut self, token: Token, points: Vec<SequencePoint>) -> Self {
        self.points.insert(token, points);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl SymbolProvider for FakeSymbols {
    fn sequence_points(&self, token: Token) -> Result<Option<Vec<SequencePoint>>> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.points.get(&token).cloned())
    }
}
