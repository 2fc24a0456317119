use std::io::{self, Cursor, Write};

use crate::graph::Graph;

pub trait Export {
    fn export<W: Write>(&self, graph: &Graph, out: &mut W) -> io::Result<()>;
}

/// Graphviz output of a graph.
pub struct Dot {
    name: String,
    get_node_label: Box<dyn Fn(usize) -> String>,
}

impl Dot {
    pub fn new<F>(name: Option<String>, get_node_label: F) -> Self
    where
        F: Fn(usize) -> String + 'static,
    {
        Self {
            name: name.unwrap_or_else(|| String::from("G")),
            get_node_label: Box::new(get_node_label),
        }
    }

    pub fn with_ids(name: Option<String>) -> Self {
        Self::new(name, |node| node.to_string())
    }

    pub fn to_string(&self, graph: &Graph) -> String {
        let mut cursor = Cursor::new(Vec::new());
        self.export(graph, &mut cursor)
            .expect("writing to vec in cursor does not fail");

        String::from_utf8(cursor.into_inner()).expect("dot format is text format")
    }
}

impl Export for Dot {
    fn export<W: Write>(&self, graph: &Graph, out: &mut W) -> io::Result<()> {
        out.write_all(b"digraph ")?;
        out.write_all(self.name.as_bytes())?;
        out.write_all(b" {\n")?;

        for node in 0..graph.node_count() {
            writeln!(
                out,
                "    v{} [label={:?}];",
                node,
                (self.get_node_label)(node)
            )?;
        }

        for (src, neighbours) in graph {
            for dst in neighbours {
                writeln!(out, "    v{src} -> v{dst};")?;
            }
        }

        out.write_all(b"}\n")?;

        Ok(())
    }
}
