use {
    super::{is_epsilon_literal, Token, CLOSE_GROUP, CONCAT, OPEN_GROUP, STAR, UNION},
    crate::error::AutomatonError,
    log::{error, trace},
};

/// Entry of the operator stack.
enum Pending {
    Operator(Token),

    /// An open parenthesis and its position.
    Group(usize),
}

fn precedence(operator: Token) -> u8 {
    match operator {
        Token::Concat => 2,
        Token::Union => 1,
        _ => 0,
    }
}

fn unterminated(expression: &str, position: usize, message: &str) -> AutomatonError {
    error!("Invalid regular expression {expression:?} at position {position}: {message}");
    AutomatonError::UnterminatedExpression(expression.to_string(), position, message.to_string())
}

/// Rewrites an expression in postfix order using the shunting-yard algorithm.
///
/// Implicit concatenation is made explicit: a [Token::Concat] is inserted between an operand (a symbol,
/// an epsilon literal, a closing parenthesis or a star) and a following symbol, epsilon literal or
/// opening parenthesis. Star is a postfix operator and goes straight to the output. The empty
/// expression yields no tokens.
///
/// Positions in errors are character (not byte) offsets into `expression`.
///
/// # Errors
/// [AutomatonError::UnterminatedExpression] for unbalanced parentheses, empty groups, operators missing
/// an operand, or a trailing operator.
pub fn to_postfix(expression: &str) -> Result<Vec<Token>, AutomatonError> {
    let mut output = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();

    // True at the start, after an opening parenthesis and after a binary operator.
    let mut expect_operand = true;
    let mut length = 0;

    for (position, c) in expression.chars().enumerate() {
        length = position + 1;

        match c {
            OPEN_GROUP => {
                if !expect_operand {
                    push_operator(&mut output, &mut stack, Token::Concat);
                }
                stack.push(Pending::Group(position));
                expect_operand = true;
            }

            CLOSE_GROUP => {
                if expect_operand {
                    let message = match stack.last() {
                        Some(Pending::Group(_)) => "empty group",
                        _ => "missing operand before ')'",
                    };
                    return Err(unterminated(expression, position, message));
                }

                loop {
                    match stack.pop() {
                        Some(Pending::Operator(operator)) => output.push(operator),
                        Some(Pending::Group(_)) => break,
                        None => return Err(unterminated(expression, position, "unbalanced ')'")),
                    }
                }
            }

            STAR => {
                if expect_operand {
                    return Err(unterminated(expression, position, "missing operand before '*'"));
                }
                output.push(Token::Star);
            }

            UNION | CONCAT => {
                if expect_operand {
                    let message = if c == UNION {
                        "missing operand before '+'"
                    } else {
                        "missing operand before '.'"
                    };
                    return Err(unterminated(expression, position, message));
                }

                let operator = if c == UNION {
                    Token::Union
                } else {
                    Token::Concat
                };
                push_operator(&mut output, &mut stack, operator);
                expect_operand = true;
            }

            _ => {
                if !expect_operand {
                    push_operator(&mut output, &mut stack, Token::Concat);
                }

                output.push(if is_epsilon_literal(c) {
                    Token::Epsilon
                } else {
                    Token::Symbol(c)
                });
                expect_operand = false;
            }
        }
    }

    if expect_operand && length > 0 {
        return Err(unterminated(expression, length, "expression ends without an operand"));
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(operator) => output.push(operator),
            Pending::Group(position) => return Err(unterminated(expression, position, "unbalanced '('")),
        }
    }

    trace!("Postfix form of {expression:?}: {output:?}");
    Ok(output)
}

/// Pops every stacked operator that binds at least as tightly as `operator` (both binary operators are
/// left-associative), then stacks `operator`.
fn push_operator(output: &mut Vec<Token>, stack: &mut Vec<Pending>, operator: Token) {
    while let Some(Pending::Operator(top)) = stack.last() {
        if precedence(*top) < precedence(operator) {
            break;
        }

        output.push(*top);
        stack.pop();
    }

    stack.push(Pending::Operator(operator));
}
