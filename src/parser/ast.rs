// AST (Abstract Syntax Tree) definitions for the G0 front end

use crate::parser::symbols::{SymbolId, SymbolTable};

/// Index of a node inside its [`Ast`] arena
pub type NodeId = usize;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

/// AST nodes. Children are referenced by [`NodeId`] into the owning [`Ast`];
/// every child has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    FunctionDef {
        symbol: SymbolId,
        params: Vec<SymbolId>,
        body: NodeId, // Seq chain
    },

    // Statement sequences: a right-leaning chain ending in SeqEnd
    Seq {
        head: NodeId,
        tail: NodeId,
    },
    SeqEnd,

    // Statements
    Assign {
        target: NodeId, // Ident
        value: NodeId,
    },
    Call {
        name: String,
        callee: Option<SymbolId>,
        args: Vec<NodeId>,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    Empty,

    // Expressions
    Ident {
        name: String,
        symbol: Option<SymbolId>,
    },
    IntConst(i32),
    Binary {
        op: BinOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Neg {
        operand: NodeId,
    },
}

/// Arena owning every node of one program.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    lines: Vec<usize>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    /// Add a node that starts on `line`.
    pub fn push(&mut self, node: Node, line: usize) -> NodeId {
        self.nodes.push(node);
        self.lines.push(line);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Source line of the node's first token
    pub fn line(&self, id: NodeId) -> usize {
        self.lines[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build a `Seq` chain over `statements`, in order, ending in `SeqEnd`.
    pub fn sequence_from(&mut self, statements: Vec<NodeId>, line: usize) -> NodeId {
        let mut tail = self.push(Node::SeqEnd, line);
        for head in statements.into_iter().rev() {
            let head_line = self.line(head);
            tail = self.push(Node::Seq { head, tail }, head_line);
        }
        tail
    }

    /// Iterate the statements of a `Seq` chain.
    pub fn sequence(&self, id: NodeId) -> Sequence<'_> {
        Sequence {
            ast: self,
            current: Some(id),
        }
    }
}

/// Iterator over the heads of a `Seq` chain.
pub struct Sequence<'a> {
    ast: &'a Ast,
    current: Option<NodeId>,
}

impl Iterator for Sequence<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let ast = self.ast;
        match ast.node(self.current?) {
            Node::Seq { head, tail } => {
                self.current = Some(*tail);
                Some(*head)
            }
            _ => {
                self.current = None;
                None
            }
        }
    }
}

/// A parsed program: the AST, its root and the Global symbol table.
#[derive(Debug, Clone)]
pub struct Program {
    pub ast: Ast,
    pub root: NodeId, // Seq chain of FunctionDef nodes
    pub symbols: SymbolTable,
}

impl Program {
    /// `FunctionDef` nodes in source order.
    pub fn functions(&self) -> Sequence<'_> {
        self.ast.sequence(self.root)
    }

    /// Find the definition of the function called `name`.
    pub fn function(&self, name: &str) -> Option<NodeId> {
        self.functions().find(|&id| match self.ast.node(id) {
            Node::FunctionDef { symbol, .. } => self.symbols.get(*symbol).name == name,
            _ => false,
        })
    }
}
