use std::collections::HashMap;

/// A parsed Omega program: the statements run from the top plus every
/// declared function body, keyed by name.
///
/// Built once per source change and never mutated afterwards; runtime frames
/// borrow slices out of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub top_level: Vec<Stmt>,
    pub functions: HashMap<String, Vec<Stmt>>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&[Stmt]> {
        self.functions.get(name).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        name: String,
        value: Expr,
    },
    Move {
        amount: Expr,
        direction: MoveDirection,
    },
    Turn {
        direction: TurnDirection,
    },
    Scan,
    Attack,
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Call {
        name: String,
    },
    NoOp,
    /// Only produced by the parser; `parse_program` moves these into
    /// [`Program::functions`].
    FunctionDecl {
        name: String,
        body: Vec<Stmt>,
    },
}

impl Stmt {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Assign { .. } => "assign",
            Stmt::Move { .. } => "move",
            Stmt::Turn { .. } => "turn",
            Stmt::Scan => "scan",
            Stmt::Attack => "attack",
            Stmt::If { .. } => "if",
            Stmt::Call { .. } => "call",
            Stmt::NoOp => "no-op",
            Stmt::FunctionDecl { .. } => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(i64),
    Variable(String),
}

impl Expr {
    /// Parses a single expression word, or `None` if it is neither a
    /// `$variable` nor an integer.
    pub fn parse_strict(text: &str) -> Option<Expr> {
        let text = text.trim();
        if let Some(name) = text.strip_prefix('$') {
            return is_identifier(name).then(|| Expr::Variable(name.to_string()));
        }
        text.parse::<i64>().ok().map(Expr::Literal)
    }

    /// Parses an expression word; anything unrecognised becomes literal 0.
    pub fn parse(text: &str) -> Expr {
        Self::parse_strict(text).unwrap_or(Expr::Literal(0))
    }

    /// Evaluates against the variable store. Unbound variables read as 0.
    pub fn evaluate(&self, variables: &HashMap<String, i64>) -> i64 {
        match self {
            Expr::Literal(value) => *value,
            Expr::Variable(name) => variables.get(name).copied().unwrap_or(0),
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Movement relative to the actor's current facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl MoveDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            MoveDirection::Forward => "FORWARD",
            MoveDirection::Backward => "BACKWARD",
            MoveDirection::StrafeLeft => "LEFT",
            MoveDirection::StrafeRight => "RIGHT",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "FORWARD" => Some(MoveDirection::Forward),
            "BACKWARD" => Some(MoveDirection::Backward),
            "LEFT" => Some(MoveDirection::StrafeLeft),
            "RIGHT" => Some(MoveDirection::StrafeRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            TurnDirection::Left => "LEFT",
            TurnDirection::Right => "RIGHT",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "LEFT" => Some(TurnDirection::Left),
            "RIGHT" => Some(TurnDirection::Right),
            _ => None,
        }
    }
}
