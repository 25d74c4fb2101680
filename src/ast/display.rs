//! Box-drawing pretty-printer for the syntax tree, used by the parser
//! stage of the driver.

use super::expr::Expr;
use super::stmt::{Program, Stmt};
use crate::intern::Interner;
use crate::token::Token;

/// Uniform view of anything that can appear as a tree child.
#[derive(Clone, Copy)]
pub enum NodeRef<'t, 'a> {
    Stmt(&'t Stmt<'a>),
    Expr(&'t Expr<'a>),
    Params(&'t [Token]),
    Body(&'t [Stmt<'a>]),
    Token(&'t Token),
}

/// Renders the whole program as an indented tree, one node per line,
/// leaves suffixed with their token text.
pub fn render_tree(program: &Program<'_>, interner: &Interner) -> String {
    let mut out = String::from("Program\n");
    let children: Vec<NodeRef> = program.statements.iter().map(NodeRef::Stmt).collect();
    render_children(&children, "", interner, &mut out);
    out
}

fn render_children(children: &[NodeRef], prefix: &str, interner: &Interner, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&label(*child, interner));
        out.push('\n');

        let grandchildren = children_of(*child);
        if !grandchildren.is_empty() {
            let extension = if last { "    " } else { "│   " };
            let deeper = format!("{prefix}{extension}");
            render_children(&grandchildren, &deeper, interner, out);
        }
    }
}

fn token_label(token: &Token, interner: &Interner) -> String {
    format!("{} : {}", token.kind(), token.text(interner))
}

fn label(node: NodeRef<'_, '_>, interner: &Interner) -> String {
    match node {
        NodeRef::Stmt(stmt) => match stmt {
            Stmt::FunctionDef(_) => "FunctionDefinition".to_string(),
            Stmt::VariableDef { .. } => "VariableDefinition".to_string(),
            Stmt::Assignment { .. } => "Assignment".to_string(),
            Stmt::Call(expr) => label(NodeRef::Expr(expr), interner),
            Stmt::If { .. } => "If".to_string(),
            Stmt::From { .. } => "From".to_string(),
            Stmt::Print { .. } => "Print".to_string(),
            Stmt::Return { .. } => "Return".to_string(),
        },
        NodeRef::Expr(expr) => match expr {
            Expr::Or(_) => "OrExpression".to_string(),
            Expr::And(_) => "AndExpression".to_string(),
            Expr::Equality(_) => "EqualityExpression".to_string(),
            Expr::Relational(_) => "RelationalExpression".to_string(),
            Expr::LogicNegation { .. } => "LogicNegation".to_string(),
            Expr::Math(_) => "MathExpression".to_string(),
            Expr::Multiplicative(_) => "MultiplicativeMathExpression".to_string(),
            Expr::MathNegation { .. } => "MathNegation".to_string(),
            Expr::TimeInfo { .. } => "TimeInfoAccess".to_string(),
            Expr::Call(_) => "FunctionCall".to_string(),
            Expr::Variable(token) | Expr::Literal(token) => token_label(token, interner),
        },
        NodeRef::Params(_) => "Parameters".to_string(),
        NodeRef::Body(_) => "Body".to_string(),
        NodeRef::Token(token) => token_label(token, interner),
    }
}

/// The node's children in tree order, as the printer walks them.
pub fn children_of<'t, 'a>(node: NodeRef<'t, 'a>) -> Vec<NodeRef<'t, 'a>> {
    match node {
        NodeRef::Stmt(stmt) => match stmt {
            Stmt::FunctionDef(def) => vec![
                NodeRef::Token(&def.name),
                NodeRef::Params(def.params),
                NodeRef::Body(def.body),
            ],
            Stmt::VariableDef { name, init } => {
                let mut children = vec![NodeRef::Token(name)];
                if let Some(init) = init {
                    children.push(NodeRef::Expr(init));
                }
                children
            }
            Stmt::Assignment { name, value } => {
                vec![NodeRef::Token(name), NodeRef::Expr(value)]
            }
            Stmt::Call(expr) => children_of(NodeRef::Expr(expr)),
            Stmt::If {
                cond,
                body,
                else_body,
            } => {
                let mut children = vec![NodeRef::Expr(cond), NodeRef::Body(body)];
                if let Some(else_body) = else_body {
                    children.push(NodeRef::Body(else_body));
                }
                children
            }
            Stmt::From {
                start,
                end,
                unit_token,
                iterator,
                body,
                ..
            } => vec![
                NodeRef::Expr(start),
                NodeRef::Expr(end),
                NodeRef::Token(unit_token),
                NodeRef::Token(iterator),
                NodeRef::Body(body),
            ],
            Stmt::Print { expr } => vec![NodeRef::Expr(expr)],
            Stmt::Return { expr, .. } => {
                expr.iter().map(|e| NodeRef::Expr(e)).collect()
            }
        },
        NodeRef::Expr(expr) => match expr {
            Expr::Or(chain)
            | Expr::And(chain)
            | Expr::Math(chain)
            | Expr::Multiplicative(chain) => {
                let mut children = vec![NodeRef::Expr(chain.first)];
                for (op, operand) in chain.rest {
                    children.push(NodeRef::Token(op));
                    children.push(NodeRef::Expr(operand));
                }
                children
            }
            Expr::Equality(cmp) | Expr::Relational(cmp) => vec![
                NodeRef::Expr(cmp.left),
                NodeRef::Token(&cmp.op),
                NodeRef::Expr(cmp.right),
            ],
            Expr::LogicNegation { op, operand } | Expr::MathNegation { op, operand } => {
                vec![NodeRef::Token(op), NodeRef::Expr(operand)]
            }
            Expr::TimeInfo {
                operand,
                unit_token,
                ..
            } => vec![NodeRef::Expr(operand), NodeRef::Token(unit_token)],
            Expr::Call(call) => {
                let mut children = vec![NodeRef::Token(&call.name)];
                children.extend(call.args.iter().map(|arg| NodeRef::Expr(arg)));
                children
            }
            Expr::Variable(_) | Expr::Literal(_) => Vec::new(),
        },
        NodeRef::Params(params) => params.iter().map(NodeRef::Token).collect(),
        NodeRef::Body(statements) => statements.iter().map(NodeRef::Stmt).collect(),
        NodeRef::Token(_) => Vec::new(),
    }
}
