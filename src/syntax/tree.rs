//! Concrete syntax tree rebuilt from completion-ordered token records.
//!
//! Records arrive children-first, so nesting cannot be read off the order.
//! Containment is the structural test instead: each new record adopts every
//! pending subtree on top of the stack whose span it contains.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorSpec, NoColor, WriteColor};

use super::{Buffer, Rule, Span, Token};

/// Index of a node in its [`SyntaxTree`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CstNode {
    pub token: Token,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

impl CstNode {
    pub fn rule(&self) -> Rule {
        self.token.rule
    }

    pub fn span(&self) -> Span {
        self.token.span()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    nodes: Vec<CstNode>,
    root: NodeId,
}

impl SyntaxTree {
    /// Rebuilds nesting from `tokens`. Empty records are skipped; `None` if
    /// no non-empty record remains.
    pub fn build(tokens: &[Token]) -> Option<Self> {
        let mut nodes: Vec<CstNode> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();

        for token in tokens.iter().filter(|token| !token.is_empty()) {
            let mut children = Vec::new();
            while let Some(&top) = stack.last() {
                if !token.span().contains(&nodes[top].span()) {
                    break;
                }
                children.push(top);
                stack.pop();
            }
            // popped most recent first
            children.reverse();
            nodes.push(CstNode {
                token: *token,
                children,
            });
            stack.push(nodes.len() - 1);
        }

        if stack.len() > 1 {
            log::debug!("{} subtrees left unattached; keeping the last", stack.len());
        }
        let root = stack.pop()?;
        Some(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &CstNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &CstNode> + '_ {
        self.nodes[id].children.iter().map(move |&child| &self.nodes[child])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids reachable from the root, parents before children.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            order.push(id);
            pending.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Pre-order list of every node's record.
    pub fn flatten(&self) -> Vec<Token> {
        self.pre_order()
            .into_iter()
            .map(|id| self.nodes[id].token)
            .collect()
    }

    /// Depth-first nodes of one rule, e.g. every `Param`.
    pub fn find_all(&self, rule: Rule) -> Vec<&CstNode> {
        self.pre_order()
            .into_iter()
            .map(|id| &self.nodes[id])
            .filter(|node| node.rule() == rule)
            .collect()
    }

    /// One line per node: indentation by depth, rule name, quoted text.
    pub fn write_to(&self, out: &mut impl WriteColor, buffer: &Buffer) -> io::Result<()> {
        let mut pending = vec![(self.root, 0usize)];
        while let Some((id, depth)) = pending.pop() {
            let node = &self.nodes[id];
            write!(out, "{:width$}", "", width = depth)?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
            write!(out, "{}", node.rule())?;
            out.reset()?;
            writeln!(out, " {:?}", node.token.text(buffer))?;
            pending.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        Ok(())
    }

    /// Uncolored rendering of [`SyntaxTree::write_to`].
    pub fn render(&self, buffer: &Buffer) -> String {
        let mut out = NoColor::new(Vec::new());
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut out, buffer);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }
}
