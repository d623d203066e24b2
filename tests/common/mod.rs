#![allow(dead_code)]

use phrase_miner::nlp::tree::{SentenceTree, TokenRow};

/// Build a tree from `(form, upos, head, deprel)`; heads are 0-based, `None` is root.
pub fn tree(rows: &[(&str, &str, Option<usize>, &str)]) -> SentenceTree {
    SentenceTree::from_rows(
        rows.iter()
            .map(|(text, pos, head, dep)| TokenRow::new(text, pos, *head, dep))
            .collect(),
        None,
    )
    .expect("valid fixture tree")
}

/// "The human brain is a highly complex organ that regulates behavior"
pub fn relative_clause_sentence() -> SentenceTree {
    tree(&[
        ("The", "DET", Some(2), "det"),
        ("human", "ADJ", Some(2), "amod"),
        ("brain", "NOUN", Some(7), "nsubj"),
        ("is", "AUX", Some(7), "cop"),
        ("a", "DET", Some(7), "det"),
        ("highly", "ADV", Some(6), "advmod"),
        ("complex", "ADJ", Some(7), "amod"),
        ("organ", "NOUN", None, "ROOT"),
        ("that", "PRON", Some(9), "nsubj"),
        ("regulates", "VERB", Some(7), "acl:relcl"),
        ("behavior", "NOUN", Some(9), "dobj"),
    ])
}

/// "The brain is a organ and a network"
pub fn coordination_sentence() -> SentenceTree {
    tree(&[
        ("The", "DET", Some(1), "det"),
        ("brain", "NOUN", Some(4), "nsubj"),
        ("is", "AUX", Some(4), "cop"),
        ("a", "DET", Some(4), "det"),
        ("organ", "NOUN", None, "ROOT"),
        ("and", "CCONJ", Some(7), "cc"),
        ("a", "DET", Some(7), "det"),
        ("network", "NOUN", Some(4), "conj"),
    ])
}

/// "The brain is the organ of thought"
pub fn nominal_modifier_sentence() -> SentenceTree {
    tree(&[
        ("The", "DET", Some(1), "det"),
        ("brain", "NOUN", Some(4), "nsubj"),
        ("is", "AUX", Some(4), "cop"),
        ("the", "DET", Some(4), "det"),
        ("organ", "NOUN", None, "ROOT"),
        ("of", "ADP", Some(6), "case"),
        ("thought", "NOUN", Some(4), "nmod"),
    ])
}

pub const CORPUS: &str = "\
# newdoc id = 10.1000/alpha
# sent_id = 1
# text = The human brain is a highly complex organ that regulates behavior
1\tThe\tthe\tDET\tDT\t_\t3\tdet\t_\t_
2\thuman\thuman\tADJ\tJJ\t_\t3\tamod\t_\t_
3\tbrain\tbrain\tNOUN\tNN\t_\t8\tnsubj\t_\t_
4\tis\tbe\tAUX\tVBZ\t_\t8\tcop\t_\t_
5\ta\ta\tDET\tDT\t_\t8\tdet\t_\t_
6\thighly\thighly\tADV\tRB\t_\t7\tadvmod\t_\t_
7\tcomplex\tcomplex\tADJ\tJJ\t_\t8\tamod\t_\t_
8\torgan\torgan\tNOUN\tNN\t_\t0\troot\t_\t_
9\tthat\tthat\tPRON\tWDT\t_\t10\tnsubj\t_\t_
10\tregulates\tregulate\tVERB\tVBZ\t_\t8\tacl:relcl\t_\t_
11\tbehavior\tbehavior\tNOUN\tNN\t_\t10\tdobj\t_\t_

# text = Neurons fire.
1\tNeurons\tneuron\tNOUN\tNNS\t_\t2\tnsubj\t_\t_
2\tfire\tfire\tVERB\tVBP\t_\t0\troot\t_\t_
3\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# newdoc id = 10.1000/beta
# text = The brain is the organ of thought
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tbrain\tbrain\tNOUN\tNN\t_\t5\tnsubj\t_\t_
3\tis\tbe\tAUX\tVBZ\t_\t5\tcop\t_\t_
4\tthe\tthe\tDET\tDT\t_\t5\tdet\t_\t_
5\torgan\torgan\tNOUN\tNN\t_\t0\troot\t_\t_
6\tof\tof\tADP\tIN\t_\t7\tcase\t_\t_
7\tthought\tthought\tNOUN\tNN\t_\t5\tnmod\t_\t_

# text = The brain is the organ of thought
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tbrain\tbrain\tNOUN\tNN\t_\t5\tnsubj\t_\t_
3\tis\tbe\tAUX\tVBZ\t_\t5\tcop\t_\t_
4\tthe\tthe\tDET\tDT\t_\t5\tdet\t_\t_
5\torgan\torgan\tNOUN\tNN\t_\t0\troot\t_\t_
6\tof\tof\tADP\tIN\t_\t7\tcase\t_\t_
7\tthought\tthought\tNOUN\tNN\t_\t5\tnmod\t_\t_

# newdoc id = 10.1000/gamma
# text = Glia are cells.
1\tGlia\tglia\tNOUN\tNNS\t_\t3\tnsubj\t_\t_
2\tare\tbe\tAUX\tVBP\t_\t3\tcop\t_\t_
3\tcells\tcell\tNOUN\tNNS\t_\t0\troot\t_\t_
4\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_
";

/// Full-text article with two mentioning paragraphs under "Introduction".
pub const JATS_ARTICLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<article article-type="research-article">
  <front>
    <journal-meta>
      <journal-title-group><journal-title>Brain Research</journal-title></journal-title-group>
    </journal-meta>
    <article-meta>
      <article-id pub-id-type="pmid">12345</article-id>
      <article-id pub-id-type="pmc">PMC999</article-id>
      <article-id pub-id-type="doi">10.1000/xyz</article-id>
      <title-group>
        <article-title>The <italic>human</italic> brain</article-title>
      </title-group>
      <contrib-group>
        <contrib contrib-type="author">
          <name><surname>Doe</surname><given-names>Jane</given-names></name>
        </contrib>
        <contrib contrib-type="author">
          <name><surname>Roe</surname><given-names>Rick</given-names></name>
        </contrib>
      </contrib-group>
      <aff id="a1"><label>1</label>Institute of Neuroscience</aff>
      <pub-date pub-type="epub"><day>3</day><month>4</month><year>2020</year></pub-date>
      <kwd-group><kwd>cortex</kwd><kwd>glia</kwd></kwd-group>
      <abstract><p>Neurons &amp; glia shape the brain.</p></abstract>
    </article-meta>
  </front>
  <body>
    <sec id="s1">
      <title>Introduction</title>
      <p>The brain is an organ<xref ref-type="bibr" rid="b1">1</xref>.</p>
      <p>Kidneys filter blood.</p>
      <p>Brains are
        large.</p>
      <sec id="s1.1">
        <title>History</title>
        <p>Early brain studies.</p>
      </sec>
    </sec>
    <sec id="s2">
      <title>Methods</title>
      <p>Mice were housed.</p>
    </sec>
  </body>
</article>
"#;
