use rstest::fixture;

use crate::Table;

pub const GREETING_TEMPLATE: &str = "Hello, {{ RecipientName }}

Welcome to {{ GroupName }}.

Thank you,
{{ SenderName }}
";

pub const GREETING_CSV: &str = "SenderName,RecipientName,GroupName
sender@example.com,recipient@example.com,group name
";

pub const GREETING_RESULT: &str = "Hello, recipient@example.com

Welcome to group name.

Thank you,
sender@example.com
";

pub const PEOPLE_CSV: &str = "Name,City,Email
Ada,London,ada@example.com
Grace,Arlington,grace@example.com
Margaret,Boston,margaret@example.com
";

#[fixture]
pub fn greeting_table() -> Table {
	Table::new("test.csv", "text/csv", GREETING_CSV.as_bytes())
		.unwrap_or_else(|e| panic!("greeting fixture should parse: {e}"))
}

#[fixture]
pub fn people_table() -> Table {
	Table::new("people.csv", "text/csv", PEOPLE_CSV.as_bytes())
		.unwrap_or_else(|e| panic!("people fixture should parse: {e}"))
}
