/*!
A recursive-descent parser for [OpenDDL](http://openddl.org/), the
text-based hierarchical data-description language used by the OpenGEX
scene interchange format and related tools.

This crate implements the parsing core only: given a buffer of OpenDDL
source, [`Parser::parse`] produces a navigable, owned tree of typed
nodes ([`DDLNode`], reached through [`NodeRef`]). It does not read
files, provide a command-line interface, validate against a schema, or
serialize trees back to text.

```
use openddl_parser::Parser;

let mut parser = Parser::new();
parser.parse(r#"
    Metric (key = "distance") { float {1.0} }
"#).expect("parse error");

let root = parser.root().expect("empty document");
for node in root.children() {
    println!("{}", node.kind());
}
```
*/

#![deny(missing_docs)]

pub mod error;
pub mod name;
pub mod node;
pub mod number;
pub mod primdata;
pub mod property;
pub mod reference;
pub mod scanner;
pub mod string;

mod parser;

pub use error::{ErrorKind, ParseError};
pub use name::{Name, NameScope};
pub use node::{DDLNode, Identifier, NodeId, NodeRef};
pub use parser::Parser;
pub use primdata::{PrimData, PrimitiveType};
pub use property::Property;
