//! Edge-Loop-Erkennung: ordnet eine ungeordnete Kanten-Selektion zu einem
//! zusammenhängenden Pfad oder Ring und extrahiert die Vertex-Kette.
//!
//! Unterstützt wird eine Selektion mit maximal zwei selektierten Kanten pro
//! Vertex. Bei Verzweigungen gewinnt der zuerst gefundene Ast, die übrigen
//! Kanten fallen aus dem Loop heraus (mit Warnung im Log).

use super::mesh::{EdgeId, MeshEdge, VertexId};
use std::collections::{HashMap, HashSet};

/// Geordnete Kantenfolge eines Pfads oder Rings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLoop {
    /// Kanten in Lauf-Reihenfolge
    pub edges: Vec<MeshEdge>,
    /// true = geschlossener Ring
    pub is_cyclic: bool,
}

impl EdgeLoop {
    /// Anzahl der Kanten im Loop
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Gibt `true` zurück, wenn der Loop keine Kanten enthält.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Inzidenz-Index: Vertex → Indizes der selektierten Kanten (in Selektionsreihenfolge)
fn incidence(selected: &[MeshEdge]) -> HashMap<VertexId, Vec<usize>> {
    let mut map: HashMap<VertexId, Vec<usize>> = HashMap::new();
    for (idx, edge) in selected.iter().enumerate() {
        map.entry(edge.vertices[0]).or_default().push(idx);
        if edge.vertices[1] != edge.vertices[0] {
            map.entry(edge.vertices[1]).or_default().push(idx);
        }
    }
    map
}

/// Wählt die Startkante für `find_edge_loop`.
///
/// Bevorzugt wird die erste Kante, die ein Loop-Ende ist: Summiert man die
/// selektierten Kanten an beiden Endpunkten (die Kante selbst zählt von jeder
/// Seite einmal), ergibt sich weniger als 4. Bildet die Selektion einen Ring,
/// wird die erste selektierte Kante genommen.
pub fn pick_starting_edge(selected: &[MeshEdge]) -> Option<MeshEdge> {
    let first = *selected.first()?;
    let incident = incidence(selected);
    let degree = |v: VertexId| incident.get(&v).map_or(0, Vec::len);

    let endpoint = selected
        .iter()
        .find(|edge| degree(edge.vertices[0]) + degree(edge.vertices[1]) < 4)
        .copied();

    Some(endpoint.unwrap_or(first))
}

/// Ein offener Besuch im Tiefensuch-Stack: Kante + als nächstes zu prüfende Seite.
struct WalkFrame {
    edge_idx: usize,
    side: usize,
}

/// Ordnet die selektierten Kanten ausgehend von `starting_edge` zu einem Edge-Loop.
///
/// Tiefensuche über gemeinsame Vertices: An jeder Kante wird erst Endpunkt 0,
/// dann Endpunkt 1 betrachtet. Ist der Endpunkt noch unbesucht, wird er markiert
/// und in die erste weitere selektierte Kante an diesem Vertex abgestiegen.
/// Kanten werden in Pre-Order gesammelt. Kehrt der Lauf zur Startkante zurück,
/// ist der Loop zyklisch; der doppelte letzte Eintrag wird entfernt.
///
/// Nur die von `starting_edge` aus erreichbare Komponente landet im Loop.
pub fn find_edge_loop(starting_edge: MeshEdge, selected: &[MeshEdge]) -> EdgeLoop {
    // Startkante muss im Index stehen, auch wenn sie nicht selektiert ist
    let mut edges: Vec<MeshEdge> = selected.to_vec();
    let start_idx = match edges.iter().position(|e| e.id == starting_edge.id) {
        Some(idx) => idx,
        None => {
            edges.push(starting_edge);
            edges.len() - 1
        }
    };
    let incident = incidence(&edges);

    let mut visited_verts: HashSet<VertexId> = HashSet::new();
    let mut order: Vec<usize> = vec![start_idx];
    let mut stack = vec![WalkFrame {
        edge_idx: start_idx,
        side: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.side > 1 {
            stack.pop();
            continue;
        }
        let edge_idx = frame.edge_idx;
        let vertex = edges[edge_idx].vertices[frame.side];
        frame.side += 1;

        if !visited_verts.insert(vertex) {
            continue;
        }

        let next = incident.get(&vertex).and_then(|candidates| {
            candidates
                .iter()
                .copied()
                .find(|&idx| edges[idx].id != edges[edge_idx].id)
        });

        if let Some(next_idx) = next {
            order.push(next_idx);
            stack.push(WalkFrame {
                edge_idx: next_idx,
                side: 0,
            });
        }
    }

    let is_cyclic = order.len() > 1 && order.first() == order.last();
    if is_cyclic {
        order.pop();
    }

    let mut seen: HashSet<EdgeId> = HashSet::new();
    let loop_edges: Vec<MeshEdge> = order
        .into_iter()
        .map(|idx| edges[idx])
        .filter(|e| seen.insert(e.id))
        .collect();

    if loop_edges.len() < selected.len() {
        log::warn!(
            "Edge-Loop: {} von {} selektierten Kanten erfasst (Verzweigung oder getrennte Selektion)",
            loop_edges.len(),
            selected.len()
        );
    }

    EdgeLoop {
        edges: loop_edges,
        is_cyclic,
    }
}

/// Extrahiert die geordnete Vertex-Kette eines Edge-Loops.
///
/// Startvertex ist der Endpunkt der ersten Kante, der nicht mit der zweiten
/// Kante geteilt wird. Offene Loops mit N Kanten liefern N+1 Vertices,
/// zyklische Loops N Vertices (der Startvertex wird am Ende nicht wiederholt).
/// Ein Loop aus einer einzelnen Kante liefert deren beide Endpunkte.
pub fn vertices_of_edge_loop(edge_loop: &EdgeLoop) -> Vec<VertexId> {
    let Some(first) = edge_loop.edges.first() else {
        return Vec::new();
    };

    let start = match edge_loop.edges.get(1) {
        Some(second) if second.touches(first.vertices[0]) => first.vertices[1],
        _ => first.vertices[0],
    };

    let mut verts = Vec::with_capacity(edge_loop.edges.len() + 1);
    verts.push(start);

    let mut previous = start;
    for edge in &edge_loop.edges {
        let Some(next) = edge.other_vertex(previous) else {
            // Kette unterbrochen (Loop nicht in Lauf-Reihenfolge)
            log::warn!(
                "Edge-Loop: Kante {} schließt nicht an Vertex {} an",
                edge.id,
                previous
            );
            break;
        };
        verts.push(next);
        previous = next;
    }

    if edge_loop.is_cyclic && verts.len() > 1 && verts.first() == verts.last() {
        verts.pop();
    }
    verts
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Offene Kette 1-2-3-...-(n+1) aus `n` Kanten, Selektion in gemischter Reihenfolge.
    fn open_chain(n: u64) -> Vec<MeshEdge> {
        let mut edges: Vec<MeshEdge> = (1..=n).map(|i| MeshEdge::new(i, i, i + 1)).collect();
        edges.reverse();
        edges.swap(0, (n / 2) as usize);
        edges
    }

    /// Geschlossener Ring aus `n` Kanten über die Vertices 1..=n.
    fn ring(n: u64) -> Vec<MeshEdge> {
        (1..=n)
            .map(|i| MeshEdge::new(i, i, if i == n { 1 } else { i + 1 }))
            .collect()
    }

    fn edge_ids(edge_loop: &EdgeLoop) -> Vec<EdgeId> {
        edge_loop.edges.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_pick_starting_edge_prefers_endpoint() {
        let selected = open_chain(5);
        let start = pick_starting_edge(&selected).expect("Startkante vorhanden");
        assert!(start.id == 1 || start.id == 5, "Startkante {} ist kein Ende", start.id);
    }

    #[test]
    fn test_pick_starting_edge_on_ring_takes_first() {
        let selected = ring(4);
        assert_eq!(pick_starting_edge(&selected).map(|e| e.id), Some(1));
    }

    #[test]
    fn test_pick_starting_edge_empty() {
        assert!(pick_starting_edge(&[]).is_none());
    }

    #[test]
    fn test_open_chain_yields_all_edges_in_walk_order() {
        let selected = open_chain(6);
        let start = pick_starting_edge(&selected).unwrap();
        let edge_loop = find_edge_loop(start, &selected);

        assert!(!edge_loop.is_cyclic);
        assert_eq!(edge_loop.len(), 6);
        for w in edge_loop.edges.windows(2) {
            assert!(
                w[1].touches(w[0].vertices[0]) || w[1].touches(w[0].vertices[1]),
                "Kanten {} und {} teilen keinen Vertex",
                w[0].id,
                w[1].id
            );
        }

        let verts = vertices_of_edge_loop(&edge_loop);
        assert_eq!(verts.len(), 7);
        let distinct: HashSet<VertexId> = verts.iter().copied().collect();
        assert_eq!(distinct.len(), 7);
        assert!(verts[0] == 1 || verts[0] == 7);
    }

    #[test]
    fn test_ring_is_cyclic_from_every_start_edge() {
        let selected = ring(4);
        for start in &selected {
            let edge_loop = find_edge_loop(*start, &selected);
            assert!(edge_loop.is_cyclic, "Start {} nicht zyklisch", start.id);
            assert_eq!(edge_loop.len(), 4);
            assert_eq!(edge_loop.edges[0].id, start.id);

            let mut ids = edge_ids(&edge_loop);
            ids.sort_unstable();
            assert_eq!(ids, vec![1, 2, 3, 4]);

            let verts = vertices_of_edge_loop(&edge_loop);
            assert_eq!(verts.len(), 4);
            let distinct: HashSet<VertexId> = verts.iter().copied().collect();
            assert_eq!(distinct.len(), 4);
        }
    }

    #[test]
    fn test_ring_vertex_chain_follows_edges() {
        let selected = ring(5);
        let edge_loop = find_edge_loop(selected[0], &selected);
        let verts = vertices_of_edge_loop(&edge_loop);
        // Kante 1 = (1, 2); Lauf über Vertex 1 zu Kante 5 = (5, 1)
        assert_eq!(verts, vec![2, 1, 5, 4, 3]);
    }

    #[test]
    fn test_disconnected_selection_keeps_reachable_part() {
        let mut selected = open_chain(3);
        selected.push(MeshEdge::new(10, 100, 101));
        selected.push(MeshEdge::new(11, 101, 102));

        let start = selected.iter().copied().find(|e| e.id == 1).unwrap();
        let edge_loop = find_edge_loop(start, &selected);
        let mut ids = edge_ids(&edge_loop);
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!edge_loop.is_cyclic);
    }

    #[test]
    fn test_fork_follows_first_branch() {
        // 1-2-3 mit Abzweig 2-4 (Vertex 2 hat drei selektierte Kanten)
        let selected = vec![
            MeshEdge::new(1, 1, 2),
            MeshEdge::new(2, 2, 3),
            MeshEdge::new(3, 2, 4),
        ];
        let edge_loop = find_edge_loop(selected[0], &selected);
        assert_eq!(edge_ids(&edge_loop), vec![1, 2]);
        assert_eq!(vertices_of_edge_loop(&edge_loop), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_edge_loop() {
        let edge = MeshEdge::new(7, 3, 9);
        let edge_loop = find_edge_loop(edge, &[edge]);
        assert_eq!(edge_loop.len(), 1);
        assert!(!edge_loop.is_cyclic);
        assert_eq!(vertices_of_edge_loop(&edge_loop), vec![3, 9]);
    }

    #[test]
    fn test_long_chain_does_not_overflow_stack() {
        let n = 200_000;
        let selected: Vec<MeshEdge> = (1..=n).map(|i| MeshEdge::new(i, i, i + 1)).collect();
        let edge_loop = find_edge_loop(selected[0], &selected);
        assert_eq!(edge_loop.len(), n as usize);
        assert_eq!(vertices_of_edge_loop(&edge_loop).len(), n as usize + 1);
    }
}
