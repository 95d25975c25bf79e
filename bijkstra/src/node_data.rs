// This file is part of netXpert.
// Copyright © 2022, 2023, 2024, 2025 André de Palma, Lucas Javaudin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Data stored for each node explored by a search.
use petgraph::graph::{EdgeIndex, NodeIndex};

/// Last step of the best known path to a node.
///
/// For a forward search, `node` is the tail of `edge`; for a backward search, it is its head.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Predecessor {
    /// Node the label comes from.
    pub node: NodeIndex,
    /// Arc used to reach the node.
    pub edge: EdgeIndex,
}

impl Predecessor {
    /// Creates a new Predecessor.
    pub const fn new(node: NodeIndex, edge: EdgeIndex) -> Self {
        Predecessor { node, edge }
    }
}

/// Trait representing the data of a node during a search, i.e., a label and (optionally) a
/// predecessor.
pub trait NodeData {
    /// Type of the label.
    type Label;
    /// Type of the predecessor.
    type Predecessor;
    /// Returns a reference to the label.
    fn label(&self) -> &Self::Label;
    /// Returns a mutable reference to the label.
    fn label_mut(&mut self) -> &mut Self::Label;
    /// Returns a reference to the predecessor (if any).
    fn predecessor(&self) -> Option<&Self::Predecessor>;
    /// Replaces the predecessor.
    fn set_predecessor(&mut self, predecessor: Option<Self::Predecessor>);
}

impl<L, P> NodeData for (L, Option<P>) {
    type Label = L;
    type Predecessor = P;
    fn label(&self) -> &L {
        &self.0
    }
    fn label_mut(&mut self) -> &mut L {
        &mut self.0
    }
    fn predecessor(&self) -> Option<&P> {
        self.1.as_ref()
    }
    fn set_predecessor(&mut self, predecessor: Option<P>) {
        self.1 = predecessor;
    }
}

/// Node data of a shortest-path search: the distance label and the predecessor.
pub type ScalarData<T> = (T, Option<Predecessor>);
