use crate::value::Value;

/// Determines whether `x` and `y` are the same function, by code address.
///
/// # Examples
///
/// ```rust
/// use trial::compare::cmp_funcs;
/// use trial::value::Value;
///
/// fn double(x: i64) -> i64 { x * 2 }
/// let f = Value::of(&(double as fn(i64) -> i64));
/// assert_eq!(cmp_funcs(&f, &f), (true, String::new()));
/// assert!(!cmp_funcs(&f, &Value::Nil).0);
/// ```
pub fn cmp_funcs(x: &Value, y: &Value) -> (bool, String) {
    if x.is_nil() || y.is_nil() {
        if x.is_nil() && y.is_nil() {
            return (true, String::new());
        }
        return (false, format!("{} != {}", x, y));
    }

    let (Value::Func(fx), Value::Func(fy)) = (x, y) else {
        return (
            false,
            format!(
                "can only compare functions x={}({}) y={}({}) ",
                x.type_name(),
                x,
                y.type_name(),
                y
            ),
        );
    };

    if fx.addr == fy.addr {
        return (true, String::new());
    }
    (
        false,
        format!("funcs not equal 0x{:x} != 0x{:x}", fy.addr, fx.addr),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_one(x: i64) -> i64 {
        x + 1
    }

    fn negate(x: i64) -> i64 {
        -x
    }

    fn func(f: fn(i64) -> i64) -> Value {
        Value::of(&f)
    }

    #[test]
    fn nil_handling() {
        assert_eq!(cmp_funcs(&Value::Nil, &Value::Nil), (true, String::new()));
        let (eq, msg) = cmp_funcs(&func(add_one), &Value::Nil);
        assert!(!eq);
        assert!(msg.ends_with(" != nil"));
    }

    #[test]
    fn identity_by_address() {
        assert!(cmp_funcs(&func(add_one), &func(add_one)).0);
        let (eq, msg) = cmp_funcs(&func(add_one), &func(negate));
        assert!(!eq);
        assert!(msg.starts_with("funcs not equal 0x"));
    }

    #[test]
    fn non_functions_are_rejected() {
        let (eq, msg) = cmp_funcs(&Value::from(1i64), &func(add_one));
        assert!(!eq);
        assert!(msg.starts_with("can only compare functions x=i64(1) y=fn(i64) -> i64("));
    }
}
