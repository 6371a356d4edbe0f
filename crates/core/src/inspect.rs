//! Topology export of the finger graph.

use std::io::Write;

use crate::error::Result;
use crate::simulator::Simulator;

/// Write the finger graph in SIF form, one line per node in ascending
/// identifier order:
///
/// ```text
/// <id> link <succ_id_1> <succ_id_2> ... <succ_id_k>
/// ```
///
/// Identifiers render in base-10 and consecutive duplicate successors
/// collapse into one edge, matching the degree statistics.
pub fn write_sif<W: Write>(sim: &Simulator, mut out: W) -> Result<()> {
    for node in sim.nodes() {
        write!(out, "{} link", node.id())?;
        for link in node.finger_table().distinct_links() {
            write!(out, " {}", sim.node(link).id())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::Id;
    use crate::dht::IdSpace;

    #[test]
    fn test_sif_lines_collapse_duplicate_successors() {
        let ids = [0u64, 1, 3].map(Id::from);
        let space = IdSpace::replay(3, ids).unwrap();
        let sim = Simulator::new(3, space).unwrap();

        let mut out = Vec::new();
        write_sif(&sim, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 link 3 0\n1 link 3 0\n3 link 0\n"
        );
    }
}
