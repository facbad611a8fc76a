//! Statement and expression IR produced by the body transpiler.
//!
//! The evaluation stack holds [`Expr`] trees, never text. A method body is a
//! flat list of [`Stmt`]s; jumps are plain gotos onto label statements, there
//! is no block structure. [`crate::ir_printer::CppPrinter`] renders the IR.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// `Type::method(...)`
    Static { type_name: String, method: String },
    /// `receiver->method(...)`
    Instance { receiver: Box<Expr>, method: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    /// A local, parameter or temporary.
    Ident(String),
    This,
    AddressOf(Box<Expr>),
    /// `Type::member`
    StaticRef { type_name: String, member: String },
    /// Always printed parenthesized.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Cast { ty: String, expr: Box<Expr> },
    /// `*(T*)(addr)`
    Deref { ty: String, addr: Box<Expr> },
    /// `object->name`
    Field { object: Box<Expr>, name: String },
    Call { callee: Callee, args: Vec<Expr> },
    /// `new Type(args)`
    New { type_name: String, args: Vec<Expr> },
    SizeOf(String),
    /// A managed string literal, constructed from its bytes and length.
    Str(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn cast(ty: impl Into<String>, expr: Expr) -> Self {
        Expr::Cast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }

    pub fn address_of(expr: Expr) -> Self {
        Expr::AddressOf(Box::new(expr))
    }

    pub fn static_call(type_name: impl Into<String>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Static {
                type_name: type_name.into(),
                method: method.into(),
            },
            args,
        }
    }

    /// Whether evaluating the expression twice could be observed.
    pub fn has_side_effects(&self) -> bool {
        match self {
            Expr::Call { .. } | Expr::New { .. } | Expr::Str(_) => true,
            Expr::Int(_) | Expr::Ident(_) | Expr::This | Expr::StaticRef { .. } | Expr::SizeOf(_) => {
                false
            }
            Expr::AddressOf(inner) => inner.has_side_effects(),
            Expr::Binary { lhs, rhs, .. } => lhs.has_side_effects() || rhs.has_side_effects(),
            Expr::Cast { expr, .. } => expr.has_side_effects(),
            Expr::Deref { addr, .. } => addr.has_side_effects(),
            Expr::Field { object, .. } => object.has_side_effects(),
        }
    }
}

/// Type of a declared temporary.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclType {
    Named(String),
    /// `decltype(expr)`, for temporaries whose type is only known from the
    /// expression stored into them.
    Of(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Declarations never carry an initializer, so a goto may jump past them.
    Declare { ty: DeclType, name: String },
    Assign { target: Expr, value: Expr },
    Expr(Expr),
    Label(String),
    Goto(String),
    IfGoto {
        cond: Expr,
        negate: bool,
        label: String,
    },
    Return(Option<Expr>),
}

impl Stmt {
    pub fn declare(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Stmt::Declare {
            ty: DeclType::Named(ty.into()),
            name: name.into(),
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }
}
