//! Condition operators and their value requirements.

use super::token::wire_token;

/// How many value slots an operator needs.
///
/// A literal value fills one slot, and so does a `valueof` column
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// The operator takes no value (`null`, `today`, `eq-userid`, ...).
    None,
    /// The operator takes exactly this many values.
    Exactly(usize),
    /// The operator takes one or more values (`in`, `not-in`, ...).
    AtLeastOne,
}

impl ValueRule {
    /// Returns `true` if `count` value slots satisfy this rule.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            ValueRule::None => count == 0,
            ValueRule::Exactly(n) => count == n,
            ValueRule::AtLeastOne => count >= 1,
        }
    }

    /// Describes why `count` slots do not satisfy this rule.
    pub(crate) fn mismatch_message(self, operator: ConditionOperator, count: usize) -> String {
        match self {
            ValueRule::None => format!("Operator '{operator}' does not accept a value"),
            ValueRule::AtLeastOne => {
                format!("Operator '{operator}' requires one or more values")
            }
            ValueRule::Exactly(n) => format!(
                "Operator '{operator}' requires exactly {n} {}, while {count} {} been provided",
                if n == 1 { "value" } else { "values" },
                if count == 1 { "value has" } else { "values have" },
            ),
        }
    }
}

use ValueRule::AtLeastOne;
use ValueRule::Exactly;

const NONE: ValueRule = ValueRule::None;
const ONE: ValueRule = Exactly(1);
const TWO: ValueRule = Exactly(2);

/// Declares the operator enum together with its token and value rule so
/// the three can never drift apart.
macro_rules! condition_operators {
    ($( $(#[$meta:meta])* $variant:ident => $token:literal, $rule:expr; )*) => {
        /// A FetchXML condition operator.
        ///
        /// See the `condition` element reference for the semantics of each
        /// operator. [`as_str`](Self::as_str) yields the wire token and
        /// [`value_rule`](Self::value_rule) the value cardinality.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ConditionOperator {
            $( $(#[$meta])* $variant, )*
        }

        impl ConditionOperator {
            /// Every operator, in declaration order.
            pub const ALL: &'static [ConditionOperator] = &[ $( ConditionOperator::$variant, )* ];

            /// Returns the wire token (e.g. `eq`, `begins-with`).
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( ConditionOperator::$variant => $token, )*
                }
            }

            /// Returns how many values the operator needs.
            pub const fn value_rule(self) -> ValueRule {
                match self {
                    $( ConditionOperator::$variant => $rule, )*
                }
            }
        }
    };
}

condition_operators! {
    /// Hierarchical: rows above the given row, excluding it.
    Above => "above", ONE;
    /// String starts with the value.
    BeginsWith => "begins-with", ONE;
    /// Inclusive range; the two values are the bounds.
    Between => "between", TWO;
    /// Multi-select choice column holds any of the values.
    ContainValues => "contain-values", AtLeastOne;
    /// String ends with the value.
    EndsWith => "ends-with", ONE;
    /// Equal to the value.
    Equal => "eq", ONE;
    /// Equal to the business unit of the calling user.
    EqualBusinessUnit => "eq-businessid", NONE;
    /// Hierarchical: the given row and every row above it.
    AboveOrEqual => "eq-or-above", ONE;
    /// Hierarchical: the given row and every row below it.
    UnderOrEqual => "eq-or-under", ONE;
    /// Equal to the id of the calling user.
    EqualUser => "eq-userid", NONE;
    /// Equal to the language of the calling user.
    EqualUserLanguage => "eq-userlanguage", NONE;
    /// The calling user or anyone below them in the manager hierarchy.
    EqualUserOrUserHierarchy => "eq-useroruserhierarchy", NONE;
    /// The calling user, their reports, or the teams of either.
    EqualUserOrUserHierarchyAndTeams => "eq-useroruserhierarchyandteams", NONE;
    /// The calling user or a team they belong to.
    EqualUserOrUserTeams => "eq-useroruserteams", NONE;
    /// A team the calling user belongs to.
    EqualUserTeams => "eq-userteams", NONE;
    /// Greater than or equal to the value.
    GreaterOrEqualThan => "ge", ONE;
    /// Greater than the value.
    GreaterThan => "gt", ONE;
    /// Equal to one of the values.
    In => "in", AtLeastOne;
    /// In the given fiscal period of any year.
    InFiscalPeriod => "in-fiscal-period", ONE;
    /// In the given fiscal period and year.
    InFiscalPeriodAndYear => "in-fiscal-period-and-year", ONE;
    /// In the given fiscal year.
    InFiscalYear => "in-fiscal-year", ONE;
    /// In or after the given fiscal period and year.
    InOrAfterFiscalPeriodAndYear => "in-or-after-fiscal-period-and-year", ONE;
    /// In or before the given fiscal period and year.
    InOrBeforeFiscalPeriodAndYear => "in-or-before-fiscal-period-and-year", ONE;
    /// In the previous fiscal period.
    LastFiscalPeriod => "last-fiscal-period", NONE;
    /// In the previous fiscal year.
    LastFiscalYear => "last-fiscal-year", NONE;
    /// In the previous calendar month.
    LastMonth => "last-month", NONE;
    /// In the last seven days, today included.
    LastSevenDays => "last-seven-days", NONE;
    /// In the previous week.
    LastWeek => "last-week", NONE;
    /// In the last N days; the value is N.
    LastXDays => "last-x-days", ONE;
    /// In the last N fiscal periods.
    LastXFiscalPeriods => "last-x-fiscal-periods", ONE;
    /// In the last N fiscal years.
    LastXFiscalYears => "last-x-fiscal-years", ONE;
    /// In the last N hours.
    LastXHours => "last-x-hours", ONE;
    /// In the last N months.
    LastXMonths => "last-x-months", ONE;
    /// In the last N weeks.
    LastXWeeks => "last-x-weeks", ONE;
    /// In the last N years.
    LastXYears => "last-x-years", ONE;
    /// In the previous calendar year.
    LastYear => "last-year", NONE;
    /// Less than or equal to the value.
    LessOrEqualThan => "le", ONE;
    /// Matches a SQL `LIKE` pattern (`%`, `_`).
    Like => "like", ONE;
    /// Less than the value.
    LessThan => "lt", ONE;
    /// Not equal to the value.
    NotEqual => "ne", ONE;
    /// Not the business unit of the calling user.
    NotEqualBusinessUnit => "ne-businessid", NONE;
    /// Not the calling user.
    NotEqualUser => "ne-userid", NONE;
    /// In the next fiscal period.
    NextFiscalPeriod => "next-fiscal-period", NONE;
    /// In the next fiscal year.
    NextFiscalYear => "next-fiscal-year", NONE;
    /// In the next calendar month.
    NextMonth => "next-month", NONE;
    /// In the next seven days, today included.
    NextSevenDays => "next-seven-days", NONE;
    /// In the next week.
    NextWeek => "next-week", NONE;
    /// In the next N days; the value is N.
    NextXDays => "next-x-days", ONE;
    /// In the next N fiscal periods.
    NextXFiscalPeriods => "next-x-fiscal-periods", ONE;
    /// In the next N fiscal years.
    NextXFiscalYears => "next-x-fiscal-years", ONE;
    /// In the next N hours.
    NextXHours => "next-x-hours", ONE;
    /// In the next N months.
    NextXMonths => "next-x-months", ONE;
    /// In the next N weeks.
    NextXWeeks => "next-x-weeks", ONE;
    /// In the next N years.
    NextXYears => "next-x-years", ONE;
    /// In the next calendar year.
    NextYear => "next-year", NONE;
    /// String does not start with the value.
    NotBeginsWith => "not-begin-with", ONE;
    /// Outside the inclusive range given by the two values.
    NotBetween => "not-between", TWO;
    /// Multi-select choice column holds none of the values.
    NotContainValues => "not-contain-values", AtLeastOne;
    /// String does not end with the value.
    NotEndsWith => "not-end-with", ONE;
    /// Equal to none of the values.
    NotIn => "not-in", AtLeastOne;
    /// Does not match the `LIKE` pattern.
    NotLike => "not-like", ONE;
    /// Has a value.
    NotNull => "not-null", NONE;
    /// Hierarchical: rows not below the given row.
    NotUnder => "not-under", ONE;
    /// Has no value.
    Null => "null", NONE;
    /// Before now minus N days; the value is N.
    OlderThanXDays => "olderthan-x-days", ONE;
    /// Before now minus N hours.
    OlderThanXHours => "olderthan-x-hours", ONE;
    /// Before now minus N minutes.
    OlderThanXMinutes => "olderthan-x-minutes", ONE;
    /// Before now minus N months.
    OlderThanXMonths => "olderthan-x-months", ONE;
    /// Before now minus N weeks.
    OlderThanXWeeks => "olderthan-x-weeks", ONE;
    /// Before now minus N years.
    OlderThanXYears => "olderthan-x-years", ONE;
    /// On the given date, ignoring the time.
    On => "on", ONE;
    /// On or after the given date.
    OnOrAfter => "on-or-after", ONE;
    /// On or before the given date.
    OnOrBefore => "on-or-before", ONE;
    /// In the current fiscal period.
    ThisFiscalPeriod => "this-fiscal-period", NONE;
    /// In the current fiscal year.
    ThisFiscalYear => "this-fiscal-year", NONE;
    /// In the current calendar month.
    ThisMonth => "this-month", NONE;
    /// In the current week.
    ThisWeek => "this-week", NONE;
    /// In the current calendar year.
    ThisYear => "this-year", NONE;
    /// On today's date.
    Today => "today", NONE;
    /// On tomorrow's date.
    Tomorrow => "tomorrow", NONE;
    /// Hierarchical: rows below the given row, excluding it.
    Under => "under", ONE;
    /// On yesterday's date.
    Yesterday => "yesterday", NONE;
}

wire_token!(ConditionOperator, "condition operator");

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(ConditionOperator::ALL.len(), 82);
    }

    #[test]
    fn test_relative_date_operators_take_a_count() {
        let relative = ConditionOperator::ALL
            .iter()
            .filter(|op| op.as_str().contains("-x-"));
        for op in relative {
            assert_eq!(op.value_rule(), ValueRule::Exactly(1), "{op}");
        }
        assert_eq!(ConditionOperator::LastSevenDays.value_rule(), ValueRule::None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<_> = ConditionOperator::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(tokens.len(), ConditionOperator::ALL.len());
    }

    #[test]
    fn test_known_tokens() {
        assert_eq!(ConditionOperator::Equal.as_str(), "eq");
        assert_eq!(ConditionOperator::BeginsWith.as_str(), "begins-with");
        assert_eq!(ConditionOperator::GreaterOrEqualThan.as_str(), "ge");
        assert_eq!(ConditionOperator::NotBeginsWith.as_str(), "not-begin-with");
        assert_eq!(ConditionOperator::NotNull.to_string(), "not-null");
    }

    #[test]
    fn test_value_rules() {
        assert_eq!(ConditionOperator::Null.value_rule(), ValueRule::None);
        assert_eq!(ConditionOperator::Like.value_rule(), ValueRule::Exactly(1));
        assert_eq!(ConditionOperator::Between.value_rule(), ValueRule::Exactly(2));
        assert_eq!(ConditionOperator::In.value_rule(), ValueRule::AtLeastOne);
    }

    #[test]
    fn test_rule_accepts() {
        assert!(ValueRule::None.accepts(0));
        assert!(!ValueRule::None.accepts(1));
        assert!(ValueRule::Exactly(2).accepts(2));
        assert!(!ValueRule::Exactly(2).accepts(1));
        assert!(ValueRule::AtLeastOne.accepts(5));
        assert!(!ValueRule::AtLeastOne.accepts(0));
    }

    #[test]
    fn test_mismatch_message() {
        let msg = ValueRule::Exactly(2).mismatch_message(ConditionOperator::Between, 1);
        assert_eq!(
            msg,
            "Operator 'between' requires exactly 2 values, while 1 value has been provided"
        );
    }

    #[test]
    fn test_parse_token() {
        let op: ConditionOperator = "on-or-after".parse().unwrap();
        assert_eq!(op, ConditionOperator::OnOrAfter);
        assert!("equals".parse::<ConditionOperator>().is_err());
    }

    #[test]
    fn test_serde_uses_token() {
        let json = serde_json::to_string(&ConditionOperator::LastXDays).unwrap();
        assert_eq!(json, r#""last-x-days""#);
        let op: ConditionOperator = serde_json::from_str(r#""not-in""#).unwrap();
        assert_eq!(op, ConditionOperator::NotIn);
    }
}
