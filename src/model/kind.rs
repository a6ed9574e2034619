//! Concrete kinds an [`ApiObject`](super::ApiObject) can take.

/// The concrete variant of a materialized object.
///
/// Kinds never affect equality or serialization; they only decide which typed
/// model an object converts into and which domain methods make sense on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Plain container with no domain meaning
    #[default]
    Generic,
    Account,
    Address,
    Money,
    Transaction,
    Transfer,
    Buy,
    Sell,
    Deposit,
    Withdrawal,
    User,
    CurrentUser,
    PaymentMethod,
    Merchant,
    Order,
    Checkout,
    Notification,
    Report,
}

impl ObjectKind {
    /// Every non-generic kind, in declaration order.
    pub const ALL: [ObjectKind; 17] = [
        ObjectKind::Account,
        ObjectKind::Address,
        ObjectKind::Money,
        ObjectKind::Transaction,
        ObjectKind::Transfer,
        ObjectKind::Buy,
        ObjectKind::Sell,
        ObjectKind::Deposit,
        ObjectKind::Withdrawal,
        ObjectKind::User,
        ObjectKind::CurrentUser,
        ObjectKind::PaymentMethod,
        ObjectKind::Merchant,
        ObjectKind::Order,
        ObjectKind::Checkout,
        ObjectKind::Notification,
        ObjectKind::Report,
    ];

    /// The kind this one specializes, if any.
    pub fn parent(&self) -> Option<ObjectKind> {
        match self {
            ObjectKind::Generic => None,
            ObjectKind::Buy | ObjectKind::Sell | ObjectKind::Deposit | ObjectKind::Withdrawal => {
                Some(ObjectKind::Transfer)
            }
            ObjectKind::CurrentUser => Some(ObjectKind::User),
            _ => Some(ObjectKind::Generic),
        }
    }

    /// Whether an object of this kind can stand in for `other`.
    ///
    /// `Buy.is_a(Transfer)` and `CurrentUser.is_a(User)` hold, and every kind
    /// is a `Generic`.
    pub fn is_a(&self, other: ObjectKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Generic => "ApiObject",
            ObjectKind::Account => "Account",
            ObjectKind::Address => "Address",
            ObjectKind::Money => "Money",
            ObjectKind::Transaction => "Transaction",
            ObjectKind::Transfer => "Transfer",
            ObjectKind::Buy => "Buy",
            ObjectKind::Sell => "Sell",
            ObjectKind::Deposit => "Deposit",
            ObjectKind::Withdrawal => "Withdrawal",
            ObjectKind::User => "User",
            ObjectKind::CurrentUser => "CurrentUser",
            ObjectKind::PaymentMethod => "PaymentMethod",
            ObjectKind::Merchant => "Merchant",
            ObjectKind::Order => "Order",
            ObjectKind::Checkout => "Checkout",
            ObjectKind::Notification => "Notification",
            ObjectKind::Report => "Report",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_a_hierarchy() {
        assert!(ObjectKind::Buy.is_a(ObjectKind::Transfer));
        assert!(ObjectKind::Withdrawal.is_a(ObjectKind::Generic));
        assert!(ObjectKind::CurrentUser.is_a(ObjectKind::User));
        assert!(!ObjectKind::User.is_a(ObjectKind::CurrentUser));
        assert!(!ObjectKind::Transfer.is_a(ObjectKind::Buy));
        assert!(!ObjectKind::Generic.is_a(ObjectKind::Account));
    }

    #[test]
    fn test_every_kind_is_generic() {
        for kind in ObjectKind::ALL {
            assert!(kind.is_a(ObjectKind::Generic), "{kind} should be generic");
            assert!(kind.is_a(kind));
        }
    }
}
